//! Query assembly for read paths.
//!
//! Query parameters are turned into a store-neutral [`Predicate`]: a
//! conjunction of clauses over named document fields. Document stores either
//! translate it into their native filter language or evaluate it directly via
//! [`Queryable`]. Only recognised parameters contribute a clause; anything
//! else in the query string is ignored.

/// Document fields that predicates may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Document identifier.
    Id,
    /// User name.
    Name,
    /// Project technologies; an equality clause means "contains".
    Technologies,
    /// Project author reference.
    AuthorId,
}

impl Field {
    /// Stored field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Name => "name",
            Self::Technologies => "technologies",
            Self::AuthorId => "authorId",
        }
    }
}

/// Constraint applied to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Field equals the value; for array fields, any element equals it.
    Equals(String),
    /// Field equals one of the values.
    AnyOf(Vec<String>),
}

impl Condition {
    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Equals(expected) => expected == candidate,
            Self::AnyOf(options) => options.iter().any(|option| option == candidate),
        }
    }
}

/// A single `field <condition>` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: Field,
    pub condition: Condition,
}

/// Conjunction of clauses. The empty predicate matches every document.
///
/// # Examples
/// ```
/// use showcase::domain::query::{Field, Predicate};
///
/// let predicate = Predicate::all().and_equals(Field::Technologies, "react");
/// assert_eq!(predicate.clauses().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Predicate matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality clause.
    pub fn and_equals(mut self, field: Field, value: impl Into<String>) -> Self {
        self.clauses.push(Clause {
            field,
            condition: Condition::Equals(value.into()),
        });
        self
    }

    /// Add a membership clause.
    pub fn and_any_of<I, S>(mut self, field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses.push(Clause {
            field,
            condition: Condition::AnyOf(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a document in memory.
    pub fn matches<D: Queryable + ?Sized>(&self, document: &D) -> bool {
        self.clauses.iter().all(|clause| {
            document
                .field_values(clause.field)
                .into_iter()
                .any(|value| clause.condition.accepts(value))
        })
    }
}

/// Documents that can be evaluated against a [`Predicate`] in memory.
pub trait Queryable {
    /// Values stored under `field`: one element for scalars, every element
    /// for arrays, none when the document has no such field.
    fn field_values(&self, field: Field) -> Vec<&str>;
}

impl Queryable for super::User {
    fn field_values(&self, field: Field) -> Vec<&str> {
        match field {
            Field::Id => vec![self.id().as_str()],
            Field::Name => vec![self.name().as_str()],
            Field::Technologies | Field::AuthorId => Vec::new(),
        }
    }
}

impl Queryable for super::Project {
    fn field_values(&self, field: Field) -> Vec<&str> {
        let draft = self.draft();
        match field {
            Field::Id => vec![self.id().as_str()],
            Field::Name => vec![draft.name()],
            Field::Technologies => draft.technologies().iter().map(String::as_str).collect(),
            Field::AuthorId => vec![draft.author_id().as_str()],
        }
    }
}

fn recognised<'a, I>(params: I, key: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    params
        .into_iter()
        .filter(|(name, _)| *name == key)
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
}

/// Build the project filter from raw query parameters.
///
/// `technology` becomes an exact-match clause on `technologies`; blank or
/// missing means unfiltered.
pub fn project_predicate<'a, I>(params: I) -> Predicate
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    match recognised(params, "technology") {
        Some(technology) => Predicate::all().and_equals(Field::Technologies, technology),
        None => Predicate::all(),
    }
}

/// Build the user filter from raw query parameters.
///
/// `username` becomes an exact-match clause on `name`.
pub fn user_predicate<'a, I>(params: I) -> Predicate
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    match recognised(params, "username") {
        Some(username) => Predicate::all().and_equals(Field::Name, username),
        None => Predicate::all(),
    }
}

/// Outcome of a collection read: either something was found or the filtered
/// collection was empty. Query failures are errors, not a variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    Found(T),
    NoneFound,
}

impl<T> Listing<T> {
    /// Whether the filtered collection was empty.
    pub fn is_none_found(&self) -> bool {
        matches!(self, Self::NoneFound)
    }
}
