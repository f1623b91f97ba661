//! Filter nodes, condition leaves and the clause union joining them.

use json_model::{ModelError, OpenEnum, OpenUnion};

json_model::wire_enum! {
    /// How a filter combines its clauses.
    pub enum Conjunction {
        And = "and",
        Or = "or",
    }
}

json_model::wire_enum! {
    pub enum Operator {
        Includes = "includes",
        Excludes = "excludes",
    }
}

json_model::record! {
    /// A leaf predicate over one property.
    pub struct Condition {
        required property, set_property: String = "property";
        required operator, set_operator: OpenEnum<Operator> = "operator";
        required values, set_values: Vec<String> = "values";
    }
}

json_model::record! {
    /// A node combining clauses, each either a condition or a nested filter.
    pub struct Filter {
        required conjunction, set_conjunction: OpenEnum<Conjunction> = "conjunction";
        required clauses, set_clauses: Vec<OpenUnion<Clause>> = "clauses";
    }
}

json_model::union_variants! {
    /// Conditions are tried first; a nested filter never has `property`.
    pub enum Clause {
        Condition(Condition),
        Filter(Box<Filter>),
    }
}

impl From<Filter> for Clause {
    fn from(filter: Filter) -> Self {
        Self::Filter(Box::new(filter))
    }
}

impl Condition {
    pub fn with(property: &str, operator: Operator, values: &[&str]) -> Self {
        let mut condition = Self::new();
        condition.set_property(property);
        condition.set_operator(operator);
        condition.set_values(values.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        condition
    }
}

impl Filter {
    pub fn with(conjunction: Conjunction, clauses: Vec<Clause>) -> Self {
        let mut filter = Self::new();
        filter.set_conjunction(conjunction);
        filter.set_clauses(
            clauses
                .into_iter()
                .map(OpenUnion::<Clause>::from)
                .collect::<Vec<_>>(),
        );
        filter
    }

    /// Nesting depth counting this node as 1. Raw-only clauses count as
    /// leaves.
    pub fn depth(&self) -> Result<usize, ModelError> {
        let mut deepest = 0;
        for (i, clause) in self.clauses()?.iter().enumerate() {
            if let Some(nested) = clause.try_pick::<Box<Filter>>() {
                let d = nested.depth().map_err(|e| e.within_index(i).within("clauses"))?;
                deepest = deepest.max(d);
            }
        }
        Ok(deepest + 1)
    }

    /// Every matched condition leaf in document order, at any depth.
    pub fn leaf_conditions(&self) -> Result<Vec<Condition>, ModelError> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out)?;
        Ok(out)
    }

    fn collect_leaves(&self, out: &mut Vec<Condition>) -> Result<(), ModelError> {
        for clause in self.clauses()? {
            match clause.try_pick::<Condition>() {
                Some(condition) => out.push(condition.clone()),
                None => {
                    if let Some(nested) = clause.try_pick::<Box<Filter>>() {
                        nested.collect_leaves(out)?;
                    }
                }
            }
        }
        Ok(())
    }
}
