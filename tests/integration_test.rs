// Integration tests for crud-table

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crud_table::app::{AppState, LoadState, Variant};
use crud_table::error::FetchError;
use crud_table::source::{HttpUserSource, UserSource, spawn_load};
use crud_table::table::{FormField, Record};

fn temp_path(tag: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("crud_table_{}_{}_{}.conf", tag, std::process::id(), nonce));
    path.to_string_lossy().to_string()
}

/// Serve a single canned HTTP response on localhost and return its URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let resp = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(resp.as_bytes());
        }
    });
    format!("http://{addr}/users")
}

fn numbered(n: u64) -> Vec<Record> {
    (1..=n).map(|i| Record::new(i, format!("Record {i}"), 20 + i as i64)).collect()
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use crud_table::app::Theme;

    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.highlight_fg), format!("{:?}", t2.highlight_fg));

    let init_path = temp_path("theme_init");
    let _ = std::fs::remove_file(&init_path);
    let _created = Theme::load_or_init(&init_path);
    assert!(std::path::Path::new(&init_path).exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init_path);
}

// 2) Keybindings file overrides defaults
#[test]
fn keymap_file_overrides_defaults() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crud_table::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keys");
    std::fs::write(&path, "# custom\nQuit = x\nNextPage = Ctrl+n\nbogus line\n").unwrap();
    let km = Keymap::from_file(&path).expect("read keymap");
    let key = |code, mods| KeyEvent::new(code, mods);
    assert_eq!(km.resolve(&key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    assert_eq!(km.resolve(&key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    assert_eq!(km.resolve(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)), Some(KeyAction::NextPage));
    assert_eq!(km.resolve(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)), Some(KeyAction::OpenHelp));

    km.write_file(&path).expect("write keymap");
    let again = Keymap::from_file(&path).expect("reread keymap");
    assert_eq!(again.resolve(&key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    let _ = std::fs::remove_file(&path);
}

// 3) Pagination over the filtered view
#[test]
fn paged_view_example() {
    let mut app = AppState::new(Variant::Paged).with_rows_per_page(4).with_records(numbered(10));
    assert_eq!(app.total_pages(), Some(3));
    assert_eq!(app.visible().iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

    assert!(app.go_to_page(2));
    assert_eq!(app.visible().iter().map(|r| r.id).collect::<Vec<_>>(), vec![5, 6, 7, 8]);

    assert!(!app.go_to_page(4));
    assert_eq!(app.pager.map(|p| p.current_page()), Some(2));

    assert!(app.next_page());
    assert!(!app.next_page());
    assert_eq!(app.visible().len(), 2);
    assert!(app.previous_page());
    assert_eq!(app.pager.map(|p| p.current_page()), Some(2));
}

// 4) Narrowing search leaves a stale page unless clamping is on
#[test]
fn stale_page_after_search() {
    let mut app = AppState::new(Variant::Paged).with_records(numbered(10));
    app.go_to_page(3);
    app.set_search("record 1");
    assert_eq!(app.filtered().len(), 2);
    assert_eq!(app.total_pages(), Some(1));
    assert!(app.visible().is_empty());
    assert_eq!(app.pager.map(|p| p.current_page()), Some(3));

    let mut app = AppState::new(Variant::Paged).with_records(numbered(10));
    app.clamp_pages = true;
    app.go_to_page(3);
    app.set_search("record 1");
    assert_eq!(app.pager.map(|p| p.current_page()), Some(1));
    assert_eq!(app.visible().iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 10]);
}

// 5) Successful load replaces rows; failed load keeps them
#[test]
fn apply_loaded_success_and_failure() {
    use crud_table::source::RemoteUser;

    let mut rng = StdRng::seed_from_u64(42);
    let mut app = AppState::new(Variant::Remote);
    app.store.set_field(FormField::Name, "Early");
    app.store.set_field(FormField::Age, "22");
    assert!(app.submit_form());

    let users = vec![RemoteUser { name: "Leanne Graham".into() }, RemoteUser { name: "Ervin Howell".into() }];
    app.apply_loaded(Ok(users), &mut rng);
    assert_eq!(app.load_state, LoadState::Loaded(2));
    assert_eq!(app.store.records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(app.store.records[1].name, "Ervin Howell");

    let mut app = AppState::new(Variant::Paged);
    app.apply_loaded(Err(FetchError::Status(503)), &mut rng);
    assert!(app.store.records.is_empty());
    assert!(matches!(app.load_state, LoadState::Failed(ref m) if m.contains("503")));
    assert!(app.modal.is_none());
}

// 6) HTTP adapter against a local server
#[test]
fn http_source_reads_user_listing() {
    let url = serve_once(
        "HTTP/1.1 200 OK",
        r#"[{"id":1,"name":"Leanne Graham","email":"a@b"},{"id":2,"name":"Ervin Howell"}]"#,
    );
    let users = HttpUserSource::new(url).expect("client").fetch_users().expect("fetch");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Leanne Graham");
}

#[test]
fn http_source_reports_status_and_decode_failures() {
    let url = serve_once("HTTP/1.1 404 Not Found", "{}");
    assert_eq!(HttpUserSource::new(url).expect("client").fetch_users(), Err(FetchError::Status(404)));

    let url = serve_once("HTTP/1.1 200 OK", r#"{"users":[]}"#);
    assert!(matches!(HttpUserSource::new(url).expect("client").fetch_users(), Err(FetchError::Decode(_))));
}

// Slow: the server answers after reqwest's default 30 s timeout would have fired.
#[test]
#[ignore]
fn http_source_waits_for_slow_server() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            thread::sleep(std::time::Duration::from_secs(35));
            let body = r#"[{"name":"Late"}]"#;
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(resp.as_bytes());
        }
    });
    let src = HttpUserSource::new(format!("http://{addr}/users")).expect("client");
    let users = src.fetch_users().expect("no request timeout");
    assert_eq!(users[0].name, "Late");
}

#[test]
fn http_source_network_failure_through_loader() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let loader = spawn_load(HttpUserSource::new(format!("http://{addr}/users")).expect("client"));
    assert!(matches!(loader.wait(), Err(FetchError::Network(_))));
}

// 7) Rendered screen shows rows and page strip
#[test]
fn render_shows_rows_and_pages() {
    use ratatui::{Terminal, backend::TestBackend};

    let app = AppState::new(Variant::Paged).with_records(numbered(10));
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
    terminal.draw(|f| crud_table::ui::render(f, &app)).unwrap();

    let screen: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
    assert!(screen.contains("Record 1"));
    assert!(screen.contains("Record 4"));
    assert!(!screen.contains("Record 5"));
    assert!(screen.contains("Page 1 of 3"));
    assert!(screen.contains("Previous"));
}
