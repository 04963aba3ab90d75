use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

use crate::db::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(TessellaUsers::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaUsers::UserId))
                    .col(ColumnDef::new(TessellaUsers::Email).string().not_null())
                    .col(ColumnDef::new(TessellaUsers::Name).string())
                    .col(
                        ColumnDef::new(TessellaUsers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_users")
                            .col(TessellaUsers::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaObjectMeta::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaObjectMeta::MetaId))
                    .col(ColumnDef::new(TessellaObjectMeta::Notes).text())
                    .col(
                        ColumnDef::new(TessellaObjectMeta::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(id_col(backend, TessellaObjectMeta::CreatedBy))
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_object_meta")
                            .col(TessellaObjectMeta::MetaId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaNamespaces::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaNamespaces::NamespaceId))
                    .col(
                        ColumnDef::new(TessellaNamespaces::Path)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TessellaNamespaces::Description).text())
                    .col(id_col(backend, TessellaNamespaces::MetaId))
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_namespaces")
                            .col(TessellaNamespaces::NamespaceId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaGeographies::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaGeographies::GeoId))
                    .col(id_col(backend, TessellaGeographies::NamespaceId))
                    .col(
                        ColumnDef::new(TessellaGeographies::Path)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TessellaGeographies::Geometry).blob())
                    .col(ColumnDef::new(TessellaGeographies::InternalPoint).blob())
                    .col(id_col(backend, TessellaGeographies::MetaId))
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_geographies")
                            .col(TessellaGeographies::GeoId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaColumns::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaColumns::ColId))
                    .col(id_col(backend, TessellaColumns::NamespaceId))
                    .col(
                        ColumnDef::new(TessellaColumns::CanonicalPath)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TessellaColumns::Kind)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TessellaColumns::ValueType)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TessellaColumns::Description).text())
                    .col(ColumnDef::new(TessellaColumns::SourceUrl).string())
                    .col(id_col(backend, TessellaColumns::MetaId))
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_columns")
                            .col(TessellaColumns::ColId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaColumnRefs::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaColumnRefs::NamespaceId))
                    .col(
                        ColumnDef::new(TessellaColumnRefs::Path)
                            .string()
                            .not_null(),
                    )
                    .col(id_col(backend, TessellaColumnRefs::ColId))
                    .col(id_col(backend, TessellaColumnRefs::MetaId))
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_column_refs")
                            .col(TessellaColumnRefs::NamespaceId)
                            .col(TessellaColumnRefs::Path),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TessellaColumnValues::Table)
                    .if_not_exists()
                    .col(id_col(backend, TessellaColumnValues::ValId))
                    .col(id_col(backend, TessellaColumnValues::ColId))
                    .col(id_col(backend, TessellaColumnValues::GeoId))
                    .col(id_col(backend, TessellaColumnValues::MetaId))
                    .col(
                        ColumnDef::new(TessellaColumnValues::ValidFrom)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TessellaColumnValues::ValidTo).big_integer())
                    .col(ColumnDef::new(TessellaColumnValues::ValBool).boolean())
                    .col(ColumnDef::new(TessellaColumnValues::ValInt).big_integer())
                    .col(ColumnDef::new(TessellaColumnValues::ValFloat).double())
                    .col(ColumnDef::new(TessellaColumnValues::ValStr).text())
                    .col(ColumnDef::new(TessellaColumnValues::ValJson).text())
                    .primary_key(
                        Index::create()
                            .name("pk_tessella_column_values")
                            .col(TessellaColumnValues::ValId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("tessella_users_email_idx")
                    .table(TessellaUsers::Table)
                    .col(TessellaUsers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("tessella_namespaces_path_idx")
                    .table(TessellaNamespaces::Table)
                    .col(TessellaNamespaces::Path)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("tessella_geographies_namespace_path_idx")
                    .table(TessellaGeographies::Table)
                    .col(TessellaGeographies::NamespaceId)
                    .col(TessellaGeographies::Path)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("tessella_columns_namespace_path_idx")
                    .table(TessellaColumns::Table)
                    .col(TessellaColumns::NamespaceId)
                    .col(TessellaColumns::CanonicalPath)
                    .unique()
                    .to_owned(),
            )
            .await?;
        // Serves the current-value lookup: (col_id, geo_id) where valid_to is null.
        manager
            .create_index(
                Index::create()
                    .name("tessella_column_values_pair_idx")
                    .table(TessellaColumnValues::Table)
                    .col(TessellaColumnValues::ColId)
                    .col(TessellaColumnValues::GeoId)
                    .col(TessellaColumnValues::ValidTo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaColumnValues::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaColumnRefs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaColumns::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaGeographies::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaNamespaces::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaObjectMeta::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TessellaUsers::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

fn id_col(backend: DatabaseBackend, col: impl Iden) -> ColumnDef {
    let mut col_def = ColumnDef::new(col);
    match backend {
        DatabaseBackend::Postgres => {
            col_def.uuid();
        }
        DatabaseBackend::MySql => {
            col_def.binary_len(16);
        }
        DatabaseBackend::Sqlite => {
            col_def.string_len(36);
        }
        _ => {
            col_def.string_len(36);
        }
    }
    col_def.not_null();
    col_def.to_owned()
}
