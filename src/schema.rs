//! Declared entity schemas: updatable fields in a fixed order, the id column, and ownership.
//! Enumerated explicitly; nothing here is derived from struct layout.

/// SQL cast applied to a bound parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cast {
    Text,
    Float8,
    Int8,
    Date,
}

impl Cast {
    pub fn as_sql(self) -> &'static str {
        match self {
            Cast::Text => "text",
            Cast::Float8 => "float8",
            Cast::Int8 => "int8",
            Cast::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// One payload key mapped to one column.
    Scalar { key: &'static str, cast: Cast },
    /// Two payload keys combined into one `point(lat, lng)` column; both must be present.
    Point { lat_key: &'static str, lng_key: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub kind: FieldKind,
    /// Only administrators may assign this column.
    pub admin_only: bool,
}

/// Owning-user column. When `pin` is set, ordinary actors always write their own id into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerScope {
    pub column: &'static str,
    pub pin: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct PatchSchema {
    /// API-facing entity name used in messages ("cat", "user").
    pub entity: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    pub id_cast: Cast,
    pub owner: Option<OwnerScope>,
    pub fields: &'static [FieldSpec],
}

impl PatchSchema {
    pub fn field(&self, column: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.column == column)
    }
}

const fn scalar(column: &'static str, cast: Cast) -> FieldSpec {
    FieldSpec {
        column,
        kind: FieldKind::Scalar { key: column, cast },
        admin_only: false,
    }
}

const fn admin_scalar(column: &'static str, cast: Cast) -> FieldSpec {
    FieldSpec {
        column,
        kind: FieldKind::Scalar { key: column, cast },
        admin_only: true,
    }
}

pub const CAT_TABLE: &str = "cat";
pub const USER_TABLE: &str = "app_user";
pub const CATEGORY_TABLE: &str = "category";
pub const SPECIES_TABLE: &str = "species";
pub const ANIMAL_TABLE: &str = "animal";

pub const CAT_SCHEMA: PatchSchema = PatchSchema {
    entity: "cat",
    table: CAT_TABLE,
    id_column: "cat_id",
    id_cast: Cast::Int8,
    owner: Some(OwnerScope {
        column: "owner",
        pin: true,
    }),
    fields: &[
        scalar("cat_name", Cast::Text),
        scalar("weight", Cast::Float8),
        scalar("filename", Cast::Text),
        scalar("birthdate", Cast::Date),
        FieldSpec {
            column: "coords",
            kind: FieldKind::Point {
                lat_key: "lat",
                lng_key: "lng",
            },
            admin_only: false,
        },
        admin_scalar("owner", Cast::Int8),
    ],
};

/// A user owns their own row: the owner column is the id column and is never reassigned.
pub const USER_SCHEMA: PatchSchema = PatchSchema {
    entity: "user",
    table: USER_TABLE,
    id_column: "user_id",
    id_cast: Cast::Int8,
    owner: Some(OwnerScope {
        column: "user_id",
        pin: false,
    }),
    fields: &[
        scalar("user_name", Cast::Text),
        scalar("email", Cast::Text),
        admin_scalar("role", Cast::Text),
    ],
};

// Catalogue entities have no owning user; writes are never scoped beyond the id.

pub const CATEGORY_SCHEMA: PatchSchema = PatchSchema {
    entity: "category",
    table: CATEGORY_TABLE,
    id_column: "category_id",
    id_cast: Cast::Int8,
    owner: None,
    fields: &[scalar("category_name", Cast::Text)],
};

pub const SPECIES_SCHEMA: PatchSchema = PatchSchema {
    entity: "species",
    table: SPECIES_TABLE,
    id_column: "species_id",
    id_cast: Cast::Int8,
    owner: None,
    fields: &[
        scalar("species_name", Cast::Text),
        scalar("category", Cast::Int8),
        scalar("image", Cast::Text),
        FieldSpec {
            column: "location",
            kind: FieldKind::Point {
                lat_key: "lat",
                lng_key: "lng",
            },
            admin_only: false,
        },
    ],
};

pub const ANIMAL_SCHEMA: PatchSchema = PatchSchema {
    entity: "animal",
    table: ANIMAL_TABLE,
    id_column: "animal_id",
    id_cast: Cast::Int8,
    owner: None,
    fields: &[
        scalar("animal_name", Cast::Text),
        scalar("species", Cast::Int8),
        scalar("birthdate", Cast::Date),
        scalar("gender", Cast::Text),
    ],
};
