use sea_orm::sea_query;
use sea_orm_migration::prelude::Iden;

#[derive(Iden, Clone, Copy)]
pub enum TessellaNamespaces {
    Table,
    NamespaceId,
    Path,
    Description,
    MetaId,
}

#[derive(Iden, Clone, Copy)]
pub enum TessellaUsers {
    Table,
    UserId,
    Email,
    Name,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum TessellaObjectMeta {
    Table,
    MetaId,
    Notes,
    CreatedAt,
    CreatedBy,
}

#[derive(Iden, Clone, Copy)]
pub enum TessellaGeographies {
    Table,
    GeoId,
    NamespaceId,
    Path,
    Geometry,
    InternalPoint,
    MetaId,
}

#[derive(Iden, Clone, Copy)]
pub enum TessellaColumns {
    Table,
    ColId,
    NamespaceId,
    CanonicalPath,
    Kind,
    ValueType,
    Description,
    SourceUrl,
    MetaId,
}

/// Canonical paths and aliases both resolve through this table.
#[derive(Iden, Clone, Copy)]
pub enum TessellaColumnRefs {
    Table,
    NamespaceId,
    Path,
    ColId,
    MetaId,
}

#[derive(Iden, Clone, Copy)]
pub enum TessellaColumnValues {
    Table,
    ValId,
    ColId,
    GeoId,
    MetaId,
    ValidFrom,
    ValidTo,
    ValBool,
    ValInt,
    ValFloat,
    ValStr,
    ValJson,
}
