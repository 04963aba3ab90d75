use std::path::Path;

use tempfile::tempdir;
use tessella::{
    ColumnCreate, ColumnKind, ColumnType, GeographyCreate, TessellaConfig, TessellaError,
    TessellaResult, TessellaStore, WriteOptions,
};

const USER: &str = "ingest@example.org";

async fn open_store(base: &Path) -> TessellaResult<TessellaStore> {
    let config = TessellaConfig::default_sqlite(base.join("tessella.sqlite").to_string_lossy());
    TessellaStore::connect(&config, base).await
}

fn options() -> WriteOptions {
    WriteOptions {
        user: Some(USER.to_string()),
        ..WriteOptions::default()
    }
}

#[tokio::test]
async fn catalog_roundtrip_resolves_paths_and_aliases() -> TessellaResult<()> {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await?;
    store.create_user(USER, Some("Ingest Bot")).await?;

    let ctx = store.begin_bulk_write(options()).await?;
    let namespace = ctx
        .create_namespace("Census 2020", Some("PL 94-171 release"))
        .await?;
    assert_eq!(namespace.path, "census-2020");
    let columns = ctx
        .create_columns(
            &namespace,
            vec![ColumnCreate {
                path: "Total Pop.".to_string(),
                aliases: vec!["P0010001".to_string()],
                kind: ColumnKind::Count,
                value_type: ColumnType::Int,
                description: Some("total population".to_string()),
                source_url: None,
            }],
        )
        .await?;
    assert_eq!(columns[0].canonical_path, "total-pop");
    let geographies = ctx
        .create_geographies(
            &namespace,
            vec![GeographyCreate {
                path: "Adams County".to_string(),
                geometry: None,
                internal_point: None,
            }],
        )
        .await?;
    ctx.finish().await?;

    let ctx = store.begin_bulk_write(options()).await?;
    let namespace = ctx
        .namespace_by_path("census 2020")
        .await?
        .expect("namespace should resolve after commit");
    let resolved = ctx
        .resolve_columns(
            &namespace,
            &["p0010001".to_string(), "Total Pop".to_string()],
        )
        .await?;
    assert_eq!(resolved["p0010001"].col_id, columns[0].col_id);
    assert_eq!(resolved["Total Pop"].col_id, columns[0].col_id);
    let resolved_geos = ctx
        .resolve_geographies(&namespace, &["adams county".to_string()])
        .await?;
    assert_eq!(resolved_geos["adams county"].geo_id, geographies[0].geo_id);
    ctx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn strict_resolution_lists_every_missing_path() -> TessellaResult<()> {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await?;
    store.create_user(USER, None).await?;

    let ctx = store.begin_bulk_write(options()).await?;
    let namespace = ctx.create_namespace("census-2020", None).await?;
    ctx.create_columns(
        &namespace,
        vec![ColumnCreate {
            path: "total-pop".to_string(),
            aliases: Vec::new(),
            kind: ColumnKind::Count,
            value_type: ColumnType::Int,
            description: None,
            source_url: None,
        }],
    )
    .await?;

    let err = ctx
        .resolve_columns(
            &namespace,
            &[
                "total-pop".to_string(),
                "vap".to_string(),
                "cvap".to_string(),
            ],
        )
        .await
        .expect_err("unknown columns should not resolve");
    match err {
        TessellaError::Unresolved { kind, paths } => {
            assert_eq!(kind, "columns");
            assert_eq!(paths, vec!["cvap".to_string(), "vap".to_string()]);
        }
        other => panic!("expected unresolved error, got {other:?}"),
    }
    ctx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_column_reference_is_rejected() -> TessellaResult<()> {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await?;
    store.create_user(USER, None).await?;

    let ctx = store.begin_bulk_write(options()).await?;
    let namespace = ctx.create_namespace("census-2020", None).await?;
    let err = ctx
        .create_columns(
            &namespace,
            vec![
                ColumnCreate {
                    path: "total-pop".to_string(),
                    aliases: vec!["P0010001".to_string()],
                    kind: ColumnKind::Count,
                    value_type: ColumnType::Int,
                    description: None,
                    source_url: None,
                },
                ColumnCreate {
                    path: "vap".to_string(),
                    aliases: vec!["p0010001".to_string()],
                    kind: ColumnKind::Count,
                    value_type: ColumnType::Int,
                    description: None,
                    source_url: None,
                },
            ],
        )
        .await
        .expect_err("colliding alias should be rejected");
    assert!(matches!(err, TessellaError::InvalidInput { .. }));
    ctx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn unknown_user_fails_scope_acquisition() -> TessellaResult<()> {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await?;
    let err = store
        .begin_bulk_write(options())
        .await
        .err()
        .expect("scope should require a registered user");
    assert!(matches!(err, TessellaError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn missing_identity_is_a_config_error() -> TessellaResult<()> {
    let dir = tempdir().expect("tempdir");
    let store = open_store(dir.path()).await?;
    let err = store
        .begin_bulk_write(WriteOptions::default())
        .await
        .err()
        .expect("scope should require an identity");
    assert!(matches!(err, TessellaError::Config { .. }));
    Ok(())
}
