//! Actor list query engine
//!
//! Turns the raw `order`, `filter`, `page` and `size` parameters into a
//! validated [`ListPlan`], runs it against the record store and projects
//! each actor down to the requested fields. Any parse failure rejects the
//! whole request.

use std::fmt;

use castdir_common::time::{format_date, format_datetime};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::{actors, Actor};
use crate::pagination::Pagination;

/// Query parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown field: {0:?}")]
    UnknownField(String),

    #[error("order token must start with '+' or '-': {0:?}")]
    MissingDirection(String),

    #[error("page and size must be positive integers, got {0:?}")]
    InvalidPage(String),
}

/// Fields that may appear in `order` and `filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorField {
    Id,
    Name,
    Country,
    Birthday,
    Deathday,
    LastUpdate,
    Shows,
}

impl ActorField {
    /// Resolve an external field name; `last_update` is accepted as an alias
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        match token {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "country" => Ok(Self::Country),
            "birthday" => Ok(Self::Birthday),
            "deathday" => Ok(Self::Deathday),
            "last-update" | "last_update" => Ok(Self::LastUpdate),
            "shows" => Ok(Self::Shows),
            other => Err(QueryError::UnknownField(other.to_string())),
        }
    }

    /// Canonical external name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Country => "country",
            Self::Birthday => "birthday",
            Self::Deathday => "deathday",
            Self::LastUpdate => "last-update",
            Self::Shows => "shows",
        }
    }

    /// Store column backing this field
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Country => "country",
            Self::Birthday => "birthday",
            Self::Deathday => "deathday",
            Self::LastUpdate => "last_update",
            Self::Shows => "shows",
        }
    }

    /// Response value of this field for one actor
    pub fn value_of(self, actor: &Actor) -> Value {
        match self {
            Self::Id => Value::from(actor.id),
            Self::Name => Value::from(actor.name.clone()),
            Self::Country => actor.country.clone().map_or(Value::Null, Value::from),
            Self::Birthday => actor.birthday.map_or(Value::Null, |d| Value::from(format_date(&d))),
            Self::Deathday => actor.deathday.map_or(Value::Null, |d| Value::from(format_date(&d))),
            Self::LastUpdate => Value::from(format_datetime(&actor.last_update)),
            Self::Shows => actor.shows.clone().map_or(Value::Null, Value::from),
        }
    }
}

impl fmt::Display for ActorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    fn sign(self) -> char {
        match self {
            Self::Ascending => '+',
            Self::Descending => '-',
        }
    }
}

/// One `order` key: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub field: ActorField,
    pub direction: SortDirection,
}

impl OrderKey {
    /// Parse `+field` / `-field`
    ///
    /// Surrounding spaces are ignored. A token with no sign but a leading
    /// space is read as `+`: an unescaped `+` in a query string arrives
    /// URL-decoded as a space.
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        let trimmed = token.trim();
        let (direction, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (SortDirection::Ascending, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (SortDirection::Descending, rest)
        } else if token.starts_with(' ') && !trimmed.is_empty() {
            (SortDirection::Ascending, trimmed)
        } else {
            return Err(QueryError::MissingDirection(trimmed.to_string()));
        };

        Ok(Self {
            field: ActorField::parse(rest.trim())?,
            direction,
        })
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.direction.sign(), self.field)
    }
}

/// Raw list parameters as they arrive on the query string
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ListParams {
    pub order: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub filter: Option<String>,
}

/// Validated list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlan {
    pub order: Vec<OrderKey>,
    pub filter: Vec<ActorField>,
    pub pagination: Pagination,
}

impl Default for ListPlan {
    fn default() -> Self {
        Self {
            order: vec![OrderKey {
                field: ActorField::Id,
                direction: SortDirection::Ascending,
            }],
            filter: vec![ActorField::Id, ActorField::Name],
            pagination: Pagination::default(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl ListPlan {
    pub fn parse(params: &ListParams) -> Result<Self, QueryError> {
        let mut plan = Self::default();

        if let Some(order) = non_blank(&params.order) {
            plan.order = order
                .split(',')
                .map(OrderKey::parse)
                .collect::<Result<_, _>>()?;
        }

        if let Some(filter) = non_blank(&params.filter) {
            plan.filter = filter
                .split(',')
                .map(|token| ActorField::parse(token.trim()))
                .collect::<Result<_, _>>()?;
        }

        plan.pagination = Pagination::parse(params.page.as_deref(), params.size.as_deref())
            .map_err(QueryError::InvalidPage)?;

        Ok(plan)
    }

    /// Query string re-encoding this plan for the given page
    ///
    /// `+` is percent-encoded so links survive URL decoding.
    pub fn query_string(&self, page: i64) -> String {
        let order = self
            .order
            .iter()
            .map(|key| key.to_string().replace('+', "%2B"))
            .collect::<Vec<_>>()
            .join(",");
        let filter = self
            .filter
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "order={}&page={}&size={}&filter={}",
            order, page, self.pagination.size, filter
        )
    }

    /// Keep only the requested fields of `actor`, in request order
    pub fn project(&self, actor: &Actor) -> Map<String, Value> {
        self.filter
            .iter()
            .map(|field| (field.as_str().to_string(), field.value_of(actor)))
            .collect()
    }

    /// Run the plan and project the requested page
    pub async fn execute(
        &self,
        pool: &SqlitePool,
    ) -> castdir_common::Result<Vec<Map<String, Value>>> {
        let rows = actors::list_actors(
            pool,
            &self.order,
            self.pagination.size,
            self.pagination.offset(),
        )
        .await?;

        Ok(rows.iter().map(|actor| self.project(actor)).collect())
    }
}
