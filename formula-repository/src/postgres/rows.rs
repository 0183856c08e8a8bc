//! Row types decoded from PostgreSQL and their conversion into domain types.
use chrono::{DateTime, Utc};
use formula_shared::types::{
    Difficulty, Familiarity, Formula, FormulaExample, FormulaGroup, Meta, UserFormulaState,
    Variable,
};
use sqlx::types::Json;

use crate::errors::RepositoryError;

pub(crate) const GROUP_COLUMNS: &str =
    "id, owner_id, name, subject, tags, description, slug, is_active, created_at, updated_at";

pub(crate) const FORMULA_COLUMNS: &str = "id, group_id, name, expression, description, variables, meta, difficulty, is_active, created_at, updated_at";

pub(crate) const EXAMPLE_COLUMNS: &str =
    "id, formula_id, title, problem, solution, data, created_at";

pub(crate) const STATE_COLUMNS: &str =
    "id, user_id, formula_id, is_favorite, note, familiarity, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct GroupRow {
    id: i64,
    owner_id: Option<i64>,
    name: String,
    subject: Option<String>,
    tags: Option<Vec<String>>,
    description: Option<String>,
    slug: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GroupRow> for FormulaGroup {
    fn from(row: GroupRow) -> Self {
        FormulaGroup {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            subject: row.subject,
            tags: row.tags,
            description: row.description,
            slug: row.slug,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FormulaRow {
    id: i64,
    group_id: Option<i64>,
    name: String,
    expression: String,
    description: Option<String>,
    variables: Option<Json<Vec<Variable>>>,
    meta: Option<Json<Meta>>,
    difficulty: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FormulaRow> for Formula {
    type Error = RepositoryError;

    fn try_from(row: FormulaRow) -> Result<Self, Self::Error> {
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(RepositoryError::invalid_literal)?;
        Ok(Formula {
            id: row.id,
            group_id: row.group_id,
            name: row.name,
            expression: row.expression,
            description: row.description,
            variables: row.variables.map(|Json(variables)| variables),
            meta: row.meta.map(|Json(meta)| meta),
            difficulty,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ExampleRow {
    id: i64,
    formula_id: i64,
    title: Option<String>,
    problem: String,
    solution: String,
    data: Option<Json<Meta>>,
    created_at: DateTime<Utc>,
}

impl From<ExampleRow> for FormulaExample {
    fn from(row: ExampleRow) -> Self {
        FormulaExample {
            id: row.id,
            formula_id: row.formula_id,
            title: row.title,
            problem: row.problem,
            solution: row.solution,
            data: row.data.map(|Json(data)| data),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct StateRow {
    id: i64,
    user_id: i64,
    formula_id: i64,
    is_favorite: bool,
    note: Option<String>,
    familiarity: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StateRow> for UserFormulaState {
    type Error = RepositoryError;

    fn try_from(row: StateRow) -> Result<Self, Self::Error> {
        let familiarity = row
            .familiarity
            .parse::<Familiarity>()
            .map_err(RepositoryError::invalid_literal)?;
        Ok(UserFormulaState {
            id: row.id,
            user_id: row.user_id,
            formula_id: row.formula_id,
            is_favorite: row.is_favorite,
            note: row.note,
            familiarity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
