//! Ownership-scoped writes: partial UPDATE and DELETE against a single row.
//!
//! A partial update is planned in three steps:
//! 1. [`collect_assignments`] turns the sparse payload into ordered `(column, value)` pairs.
//! 2. [`ownership_clause`] decides, from the actor's role, whether the owner column is pinned
//!    and whether the row filter is narrowed to the actor's own rows.
//! 3. [`UpdatePlan::to_query`] assembles one conditional statement, so the ownership check and the
//!    mutation happen atomically in the store.
//!
//! Placeholders are numbered assignments first, then filters; for fixed inputs the SQL and
//! parameter list are identical on every call.

use crate::actor::Actor;
use crate::schema::{Cast, FieldKind, PatchSchema};
use crate::sql::builder::{qualified_table, quoted, QueryBuf};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum AssignedValue {
    Scalar { value: Value, cast: Cast },
    /// `point(lat, lng)`.
    Point { lat: Value, lng: Value },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub column: &'static str,
    pub value: AssignedValue,
}

impl Assignment {
    pub fn scalar(column: &'static str, value: impl Into<Value>, cast: Cast) -> Self {
        Assignment {
            column,
            value: AssignedValue::Scalar {
                value: value.into(),
                cast,
            },
        }
    }
}

/// Equality predicate `column = value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: Value,
    pub cast: Cast,
}

/// Assignments for every declared field present in `payload`, in declaration order.
///
/// Unknown keys are ignored. An explicit JSON null is kept (the column is set to NULL).
/// A point field is only assigned when both of its keys are present.
pub fn collect_assignments(schema: &PatchSchema, payload: &Map<String, Value>) -> Vec<Assignment> {
    let mut out = Vec::new();
    for field in schema.fields {
        match field.kind {
            FieldKind::Scalar { key, cast } => {
                if let Some(v) = payload.get(key) {
                    out.push(Assignment::scalar(field.column, v.clone(), cast));
                }
            }
            FieldKind::Point { lat_key, lng_key } => {
                if let (Some(lat), Some(lng)) = (payload.get(lat_key), payload.get(lng_key)) {
                    out.push(Assignment {
                        column: field.column,
                        value: AssignedValue::Point {
                            lat: lat.clone(),
                            lng: lng.clone(),
                        },
                    });
                }
            }
        }
    }
    out
}

/// Extra assignment and filter that confine a write to the actor's own rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnershipClause {
    pub assignment: Option<Assignment>,
    pub filter: Option<Predicate>,
}

/// Administrators get an empty clause. Ordinary actors are filtered on the owner column and,
/// when the schema pins ownership, also write their own id into it.
pub fn ownership_clause(schema: &PatchSchema, actor: &Actor) -> OwnershipClause {
    let Some(owner) = schema.owner else {
        return OwnershipClause::default();
    };
    if actor.is_admin() {
        return OwnershipClause::default();
    }
    OwnershipClause {
        assignment: owner
            .pin
            .then(|| Assignment::scalar(owner.column, actor.id, Cast::Int8)),
        filter: Some(Predicate {
            column: owner.column,
            value: Value::from(actor.id),
            cast: Cast::Int8,
        }),
    }
}

impl OwnershipClause {
    /// Merge into collected assignments. For ordinary actors, admin-only fields are dropped,
    /// and any payload value for the pinned column is replaced by the actor's id.
    pub fn apply(
        self,
        schema: &PatchSchema,
        actor: &Actor,
        mut assignments: Vec<Assignment>,
    ) -> (Vec<Assignment>, Option<Predicate>) {
        if !actor.is_admin() {
            assignments.retain(|a| !schema.field(a.column).is_some_and(|f| f.admin_only));
        }
        if let Some(pinned) = self.assignment {
            assignments.retain(|a| a.column != pinned.column);
            assignments.push(pinned);
        }
        (assignments, self.filter)
    }
}

/// A single-row conditional UPDATE, ready to assemble.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatePlan {
    pub table: &'static str,
    /// Used as a no-op assignment when nothing else is assigned.
    pub id_column: &'static str,
    pub assignments: Vec<Assignment>,
    /// Always starts with the id predicate.
    pub filters: Vec<Predicate>,
}

fn id_predicate(schema: &PatchSchema, target: &Value) -> Predicate {
    Predicate {
        column: schema.id_column,
        value: target.clone(),
        cast: schema.id_cast,
    }
}

pub fn plan_update(
    schema: &PatchSchema,
    payload: &Map<String, Value>,
    target: &Value,
    actor: &Actor,
) -> UpdatePlan {
    let collected = collect_assignments(schema, payload);
    let (assignments, owner_filter) = ownership_clause(schema, actor).apply(schema, actor, collected);
    let mut filters = vec![id_predicate(schema, target)];
    filters.extend(owner_filter);
    UpdatePlan {
        table: schema.table,
        id_column: schema.id_column,
        assignments,
        filters,
    }
}

fn where_clause(q: &mut QueryBuf, filters: &[Predicate]) -> String {
    filters
        .iter()
        .map(|p| {
            let ph = q.push_param(p.value.clone(), p.cast);
            format!("{} = {}", quoted(p.column), ph)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl UpdatePlan {
    pub fn to_query(&self, db_schema: &str) -> QueryBuf {
        let mut q = QueryBuf::new();
        let table = qualified_table(db_schema, self.table);
        let mut sets: Vec<String> = self
            .assignments
            .iter()
            .map(|a| {
                let rhs = match &a.value {
                    AssignedValue::Scalar { value, cast } => q.push_param(value.clone(), *cast),
                    AssignedValue::Point { lat, lng } => {
                        let lat = q.push_param(lat.clone(), Cast::Float8);
                        let lng = q.push_param(lng.clone(), Cast::Float8);
                        format!("point({}, {})", lat, lng)
                    }
                };
                format!("{} = {}", quoted(a.column), rhs)
            })
            .collect();
        if sets.is_empty() {
            sets.push(format!("{} = {}", quoted(self.id_column), quoted(self.id_column)));
        }
        let filter = where_clause(&mut q, &self.filters);
        q.sql = format!("UPDATE {} SET {} WHERE {}", table, sets.join(", "), filter);
        q
    }
}

/// DELETE one row by id, narrowed to the actor's rows for ordinary actors.
pub fn delete_scoped(schema: &PatchSchema, db_schema: &str, target: &Value, actor: &Actor) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, schema.table);
    let mut filters = vec![id_predicate(schema, target)];
    filters.extend(ownership_clause(schema, actor).filter);
    let filter = where_clause(&mut q, &filters);
    q.sql = format!("DELETE FROM {} WHERE {}", table, filter);
    q
}
