//! End-to-end protocol tests against a real listener on an ephemeral port.

use dirserve::config::Config;
use dirserve::server::listener::{bootstrap, serve};
use dirserve::service::Services;
use dirserve::store::{FlatFile, GroupStore, UserStore};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    _dir: Option<tempfile::TempDir>,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut server = Self::start_on(dir.path()).await;
        server._dir = Some(dir);
        server
    }

    /// Boot a server over an existing data directory, as a process restart
    /// would.
    async fn start_on(data_dir: &Path) -> Self {
        let mut config = Config::default();
        config.data_dir = data_dir.to_path_buf();
        config.idle_timeout = Duration::from_secs(10);

        let user_store = Arc::new(Mutex::new(UserStore::new(Box::new(FlatFile::new(
            config.users_path(),
        )))));
        let group_store = Arc::new(Mutex::new(GroupStore::new(Box::new(FlatFile::new(
            config.groups_path(),
        )))));
        user_store.lock().await.load().unwrap();
        group_store.lock().await.load().unwrap();
        bootstrap(&config, &user_store, &group_store).await.unwrap();

        let services = Arc::new(Services::new(user_store, group_store));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        tokio::spawn(serve(listener, services, Arc::new(config), shutdown.clone()));

        Self {
            addr,
            shutdown,
            _dir: None,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read),
            writer,
        };
        let greeting = client.read_json().await;
        assert_eq!(greeting["status"], "OK");
        client
    }

    async fn read_json(&mut self) -> Value {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.unwrap();
        assert!(n > 0, "connection closed unexpectedly");
        serde_json::from_str(line.trim()).unwrap()
    }

    async fn send(&mut self, request: &str) -> Value {
        self.writer
            .write_all(format!("{request}\n").as_bytes())
            .await
            .unwrap();
        self.read_json().await
    }

    /// Returns the number of bytes on the next read; 0 means the server
    /// closed the socket.
    async fn read_raw(&mut self) -> usize {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap()
    }
}

#[tokio::test]
async fn end_to_end_admin_workflow() {
    let server = TestServer::start().await;
    let mut admin = Client::connect(server.addr).await;

    // 1. bootstrap admin can authenticate
    let auth = admin.send("AUTH admin admin123").await;
    assert_eq!(auth["status"], "OK");
    assert_eq!(auth["role"], "admin");
    assert_eq!(auth["groups"], serde_json::json!(["admins"]));

    // 2. create a user and authenticate as it
    assert_eq!(admin.send("ADDUSER alice pw123 user").await["status"], "OK");
    let mut alice = Client::connect(server.addr).await;
    let auth = alice.send("AUTH alice pw123").await;
    assert_eq!(auth["status"], "OK");
    assert_eq!(auth["role"], "user");

    // 3. plain user may not read someone else
    let denied = alice.send("READUSER bob").await;
    assert_eq!(denied["status"], "ERROR");
    assert_eq!(denied["message"], "Permission denied");

    // 4. group lifecycle as admin
    assert_eq!(admin.send("CREATEGROUP eng").await["status"], "OK");
    assert_eq!(admin.send("ADDUSERTOGROUP alice eng").await["status"], "OK");
    let listing = admin.send("LISTGROUP").await;
    assert_eq!(listing["status"], "OK");
    let groups = listing["groups"].as_array().unwrap();
    let eng = groups.iter().find(|g| g["name"] == "eng").unwrap();
    assert_eq!(eng["members"], serde_json::json!(["alice"]));

    // 5. deletion is admin-only and takes effect
    assert_eq!(alice.send("DELETEUSER alice").await["message"], "Permission denied");
    assert_eq!(admin.send("DELETEUSER alice").await["status"], "OK");
    let mut retry = Client::connect(server.addr).await;
    let gone = retry.send("AUTH alice pw123").await;
    assert_eq!(gone["status"], "ERROR");
    assert_eq!(gone["message"], "user alice not found");
}

#[tokio::test]
async fn sessions_are_isolated_between_connections() {
    let server = TestServer::start().await;
    let mut admin = Client::connect(server.addr).await;
    assert_eq!(admin.send("AUTH admin admin123").await["status"], "OK");
    assert_eq!(admin.send("ADDUSER bob pw user").await["status"], "OK");

    // a second, unauthenticated connection sees none of that state
    let mut anon = Client::connect(server.addr).await;
    assert_eq!(anon.send("LISTUSER").await["message"], "Authenticate first");

    // and authenticating it does not touch the first connection's identity
    assert_eq!(anon.send("AUTH bob pw").await["role"], "user");
    assert_eq!(anon.send("DELETEUSER bob").await["message"], "Permission denied");
    assert_eq!(admin.send("READUSER bob").await["status"], "OK");
}

#[tokio::test]
async fn ping_works_without_auth_and_exit_closes() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;

    let pong = client.send("PING").await;
    assert_eq!(pong["status"], "OK");
    assert!(pong["time"].is_string());

    let farewell = client.send("EXIT").await;
    assert_eq!(farewell["status"], "OK");
    assert_eq!(farewell["message"], "Bye");
    assert_eq!(client.read_raw().await, 0, "socket should be closed");
}

#[tokio::test]
async fn malformed_lines_do_not_end_the_session() {
    let server = TestServer::start().await;
    let mut client = Client::connect(server.addr).await;

    assert_eq!(client.send("").await["message"], "Empty command");
    assert_eq!(
        client.send("WAT is this").await["message"],
        "Unknown command: WAT"
    );
    assert_eq!(
        client.send("AUTH admin").await["message"],
        "Usage: AUTH <username> <password>"
    );
    // the connection is still fully usable
    assert_eq!(client.send("AUTH admin admin123").await["status"], "OK");
}

#[tokio::test]
async fn interleaved_mutations_all_survive() {
    let server = TestServer::start().await;
    let addr = server.addr;

    let spawn_writer = |prefix: &'static str| {
        tokio::spawn(async move {
            let mut client = Client::connect(addr).await;
            assert_eq!(client.send("AUTH admin admin123").await["status"], "OK");
            for i in 0..5 {
                let reply = client.send(&format!("ADDUSER {prefix}{i} pw user")).await;
                assert_eq!(reply["status"], "OK");
            }
        })
    };
    let (a, b) = tokio::join!(spawn_writer("u"), spawn_writer("v"));
    a.unwrap();
    b.unwrap();

    let mut client = Client::connect(addr).await;
    assert_eq!(client.send("AUTH admin admin123").await["status"], "OK");
    let listing = client.send("LISTUSER").await;
    let users = listing["users"].as_array().unwrap();
    for prefix in ["u", "v"] {
        for i in 0..5 {
            let name = format!("{prefix}{i}");
            assert!(
                users.iter().any(|u| u["username"] == name.as_str()),
                "{name} missing from listing"
            );
        }
    }
}

#[tokio::test]
async fn state_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let server = TestServer::start_on(dir.path()).await;
        let mut client = Client::connect(server.addr).await;
        assert_eq!(client.send("AUTH admin admin123").await["status"], "OK");
        assert_eq!(
            client.send("ADDUSER alice pw123 developer a@example.com Alice Liddell").await
                ["status"],
            "OK"
        );
        assert_eq!(client.send("CREATEGROUP eng").await["status"], "OK");
        assert_eq!(client.send("ADDUSERTOGROUP alice eng").await["status"], "OK");
    }

    let server = TestServer::start_on(dir.path()).await;
    let mut client = Client::connect(server.addr).await;
    let auth = client.send("AUTH alice pw123").await;
    assert_eq!(auth["status"], "OK");
    assert_eq!(auth["role"], "developer");
    assert_eq!(auth["groups"], serde_json::json!(["eng"]));

    let read = client.send("READUSER alice").await;
    assert_eq!(read["user"]["fullName"], "Alice Liddell");
    assert_eq!(read["user"]["email"], "a@example.com");
}

#[tokio::test]
async fn deleting_a_user_leaves_group_membership_behind() {
    // soft references: membership is not cascaded on user deletion
    let server = TestServer::start().await;
    let mut admin = Client::connect(server.addr).await;
    assert_eq!(admin.send("AUTH admin admin123").await["status"], "OK");
    assert_eq!(admin.send("ADDUSER carol pw user").await["status"], "OK");
    assert_eq!(admin.send("CREATEGROUP qa").await["status"], "OK");
    assert_eq!(admin.send("ADDUSERTOGROUP carol qa").await["status"], "OK");
    assert_eq!(admin.send("DELETEUSER carol").await["status"], "OK");

    let listing = admin.send("LISTGROUP").await;
    let groups = listing["groups"].as_array().unwrap();
    let qa = groups.iter().find(|g| g["name"] == "qa").unwrap();
    assert_eq!(qa["members"], serde_json::json!(["carol"]));
}
