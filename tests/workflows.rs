use rand::distributions::Alphanumeric;
use rand::Rng;
use sharepoint_files::transport::memory::{MemoryAuthProvider, MemoryTransport};
use sharepoint_files::{Client, Credentials, Error, UploadTarget};
use temp_dir::TempDir;

const SITE: &str = "https://contoso.sharepoint.com/sites/team";

fn init() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn random_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

fn create_file(size: usize) -> Vec<u8> {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .collect()
}

async fn connect(transport: MemoryTransport) -> Client<MemoryTransport> {
    init();
    let auth = MemoryAuthProvider::new("client-id", "client-secret");
    Client::connect(
        &auth,
        Credentials::new(SITE, "client-id", "client-secret"),
        transport,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn rejected_credentials() {
    init();
    let auth = MemoryAuthProvider::new("client-id", "client-secret");
    let err = Client::connect(
        &auth,
        Credentials::new(SITE, "client-id", "wrong"),
        MemoryTransport::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
}

#[tokio::test]
async fn upload_then_download() {
    let local = TempDir::new().unwrap();
    let downloads = TempDir::new().unwrap();
    let source = local.child("report.csv");
    std::fs::write(&source, "a,b\n1,2\n").unwrap();

    let client = connect(MemoryTransport::new("Team Site").with_folder("/site/Docs")).await;
    assert_eq!(client.test_connection().await.unwrap(), "Team Site");

    let remote = client.upload_file(&source, "/site/Docs/").await.unwrap();
    assert_eq!(remote, "/site/Docs/report.csv");

    let written = client
        .download_file(&remote, downloads.path())
        .await
        .unwrap();
    assert_eq!(written, downloads.child("report.csv"));
    assert_eq!(std::fs::read(&written).unwrap(), b"a,b\n1,2\n");
}

#[tokio::test]
async fn spreadsheet_destination_keeps_local_name() {
    let local = TempDir::new().unwrap();
    let source = local.child("data.xlsx");
    std::fs::write(&source, create_file(512)).unwrap();

    let client = connect(MemoryTransport::default().with_folder("/site/Docs")).await;
    let remote = client
        .upload_file(&source, "/site/Docs/ignored_name.xlsx")
        .await
        .unwrap();
    assert_eq!(remote, "/site/Docs/data.xlsx");

    let files = client.list_files("/site/Docs").await.unwrap();
    assert!(files.contains_key("data.xlsx"));
    assert!(!files.contains_key("ignored_name.xlsx"));

    let renamed = client
        .upload_file(&source, UploadTarget::file("/site/Docs/kept_name.xlsx"))
        .await
        .unwrap();
    assert_eq!(renamed, "/site/Docs/kept_name.xlsx");
}

#[tokio::test]
async fn list_returns_every_file() {
    let local = TempDir::new().unwrap();
    let client = connect(MemoryTransport::default().with_folder("/site/Docs/Nested")).await;
    let mut names = Vec::new();
    for _ in 0..5 {
        let name = format!("{}.bin", random_name());
        let source = local.child(&name);
        std::fs::write(&source, create_file(64)).unwrap();
        client.upload_file(&source, "/site/Docs").await.unwrap();
        names.push(name);
    }
    let files = client.list_files("/site/Docs").await.unwrap();
    assert_eq!(files.len(), names.len());
    for name in names {
        assert_eq!(files[&name]["Name"], name.as_str());
    }
}

#[tokio::test]
async fn copy_move_and_delete() {
    let content = create_file(1024 * 64);
    let client = connect(
        MemoryTransport::default()
            .with_file("/site/Docs/archive.bin", content.clone())
            .with_folder("/site/Backup")
            .with_folder("/site/Archive"),
    )
    .await;

    let copied = client
        .copy_file("/site/Docs/archive.bin", "/site/Backup")
        .await
        .unwrap();
    assert_eq!(copied, "/site/Backup/archive.bin");
    assert_eq!(
        client.read_file_in_memory(&copied).await.unwrap().as_ref(),
        content.as_slice()
    );

    let moved = client
        .move_file("/site/Docs/archive.bin", "/site/Archive")
        .await
        .unwrap();
    assert_eq!(moved, "/site/Archive/archive.bin");
    let err = client
        .read_file_in_memory("/site/Docs/archive.bin")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        client.read_file_in_memory(&moved).await.unwrap().as_ref(),
        content.as_slice()
    );

    client.delete_file(&copied).await.unwrap();
    let err = client.delete_file(&copied).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn partial_move_is_reported() {
    let transport = MemoryTransport::default()
        .with_file("/site/Docs/locked.txt", "locked")
        .with_folder("/site/Archive");
    transport.deny_writes("/site/Docs/locked.txt");
    let client = connect(transport).await;

    let err = client
        .move_file("/site/Docs/locked.txt", "/site/Archive")
        .await
        .unwrap_err();
    let (source_path, destination) = match err {
        Error::PartialMove {
            source_path,
            destination,
            ..
        } => (source_path, destination),
        other => panic!("expected a partial move, got {other:?}"),
    };
    assert_eq!(source_path, "/site/Docs/locked.txt");
    assert_eq!(destination, "/site/Archive/locked.txt");
    assert!(client.get_file(&source_path).await.is_ok());
    assert!(client.get_file(&destination).await.is_ok());
}
