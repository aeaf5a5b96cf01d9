use std::sync::Arc;
use std::time::Duration;

use imgstore_core::{ErrorKind, GatewayBuilder, GatewayConfig, ImageGateway};
use rstest::*;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
fn cancel_token() -> CancellationToken {
    CancellationToken::new()
}

fn gateway(root: &TempDir, upload_read_limit: usize) -> ImageGateway {
    let cfg = GatewayConfig {
        upload_read_limit,
        list_limit: 100,
        root_dir: root.path().to_path_buf(),
        extension: "jpg".to_string(),
    };
    GatewayBuilder::from_config(cfg).build().expect("gateway should build")
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn upload_cat_then_list_shows_cat_jpg(temp_dir: TempDir, cancel_token: CancellationToken) {
    let gw = gateway(&temp_dir, 10);

    let name = gw.upload("cat", &[0xFF, 0xD8], &cancel_token).await.unwrap();
    assert_eq!(name, "cat.jpg");
    assert_eq!(std::fs::read(temp_dir.path().join("cat.jpg")).unwrap(), vec![0xFF, 0xD8]);

    let list = gw.list_images(&cancel_token).await.unwrap();
    let cat = list.iter().find(|i| i.name == "cat.jpg").expect("cat.jpg listed");
    assert!(cat.modified.is_some());
    assert!(!cat.modification_display().is_empty());
}

#[rstest]
#[case("simple", b"Hello, World!".as_slice())]
#[case("empty", b"".as_slice())]
#[case("binary", [0x00, 0xFF, 0x80, 0x7F].as_slice())]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn round_trip_through_stored_file_name(
    temp_dir: TempDir,
    cancel_token: CancellationToken,
    #[case] identifier: &str,
    #[case] data: &[u8],
) {
    let gw = gateway(&temp_dir, 10);

    let name = gw.upload(identifier, data, &cancel_token).await.unwrap();
    let read = gw.get_image(&name, &cancel_token).await.unwrap();
    assert_eq!(read, data);
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn upload_overwrites_existing_artifact(temp_dir: TempDir, cancel_token: CancellationToken) {
    let gw = gateway(&temp_dir, 10);

    gw.upload("dog", b"old and longer", &cancel_token).await.unwrap();
    gw.upload("dog", b"new", &cancel_token).await.unwrap();

    assert_eq!(gw.get_image("dog.jpg", &cancel_token).await.unwrap(), b"new");
    assert_eq!(gw.list_images(&cancel_token).await.unwrap().len(), 1);
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn get_missing_on_empty_store_is_not_found(temp_dir: TempDir, cancel_token: CancellationToken) {
    let gw = gateway(&temp_dir, 10);

    let err = gw.get_image("missing", &cancel_token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("missing"));
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn empty_root_lists_nothing(temp_dir: TempDir, cancel_token: CancellationToken) {
    let gw = gateway(&temp_dir, 10);
    assert!(gw.list_images(&cancel_token).await.unwrap().is_empty());
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn listing_includes_foreign_files_and_skips_directories(
    temp_dir: TempDir,
    cancel_token: CancellationToken,
) {
    std::fs::write(temp_dir.path().join("notes.txt"), b"not an image").unwrap();
    std::fs::create_dir(temp_dir.path().join("thumbs")).unwrap();
    let gw = gateway(&temp_dir, 10);
    gw.upload("cat", b"x", &cancel_token).await.unwrap();

    let names: Vec<String> = gw
        .list_images(&cancel_token)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["cat.jpg", "notes.txt"]);
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn listing_fails_as_internal_when_root_disappears(
    temp_dir: TempDir,
    cancel_token: CancellationToken,
) {
    let root = temp_dir.path().join("media");
    std::fs::create_dir(&root).unwrap();
    let gw = GatewayBuilder::new().root_dir(&root).build().unwrap();
    std::fs::remove_dir(&root).unwrap();

    let err = gw.list_images(&cancel_token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(gw.status().list.in_flight, 0);
}

#[rstest]
#[timeout(Duration::from_secs(10))]
#[tokio::test]
async fn concurrent_uploads_all_land(temp_dir: TempDir) {
    let gw = Arc::new(gateway(&temp_dir, 2));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gw = Arc::clone(&gw);
            tokio::spawn(async move {
                gw.upload(&format!("img{i}"), &[i as u8; 64], &CancellationToken::new())
                    .await
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let list = gw.list_images(&CancellationToken::new()).await.unwrap();
    assert_eq!(list.len(), 16);
    assert_eq!(gw.status().upload_or_read.available, 2);
}

#[rstest]
#[timeout(Duration::from_secs(5))]
#[tokio::test]
async fn absolute_identifiers_resolve_under_root(temp_dir: TempDir, cancel_token: CancellationToken) {
    let outside = TempDir::new().unwrap();
    std::fs::write(outside.path().join("secret"), b"outside-root").unwrap();
    let gw = gateway(&temp_dir, 10);

    let secret = format!("{}/secret", outside.path().display());
    let err = gw.get_image(&secret, &cancel_token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let target = format!("{}/w", outside.path().display());
    let _ = gw.upload(&target, b"x", &cancel_token).await;
    assert!(!outside.path().join("w.jpg").exists());
}
