mod common;

use warp::http::StatusCode;

use common::{register, settings, ADMIN, PASSWORD};
use notes_hub::routes;
use notes_hub::store::Store;
use notes_hub::types::note::{NewNote, NoteScope};

const FORM: &str = "application/x-www-form-urlencoded";

fn location(res: &warp::http::Response<warp::hyper::body::Bytes>) -> &str {
    res.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn body(res: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    String::from_utf8_lossy(res.body()).into_owned()
}

#[tokio::test]
async fn anonymous_visitors_are_sent_to_login() {
    let api = routes::build(Store::in_memory(), settings());

    for path in ["/", "/dashboard", "/admin"] {
        let res = warp::test::request().path(path).reply(&api).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&res), "/login");
    }

    let res = warp::test::request().path("/login").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("action='/session'"));
}

#[tokio::test]
async fn signed_in_users_skip_the_login_page() {
    let store = Store::in_memory();
    let settings = settings();
    let alice = register(&store, &settings, "alice@example.com").await;
    let api = routes::build(store, settings);

    let res = warp::test::request()
        .path("/login")
        .header("cookie", alice.cookie())
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/dashboard");
}

#[tokio::test]
async fn non_admins_are_sent_back_to_the_dashboard() {
    let store = Store::in_memory();
    let settings = settings();
    let alice = register(&store, &settings, "alice@example.com").await;
    let admin = register(&store, &settings, ADMIN).await;
    let api = routes::build(store, settings);

    let res = warp::test::request()
        .path("/admin")
        .header("cookie", alice.cookie())
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");

    let res = warp::test::request()
        .path("/admin")
        .header("cookie", admin.cookie())
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body(&res).contains("Showing 0 of 0 notes from 2 users"));
}

#[tokio::test]
async fn sign_in_form_sets_the_session_cookie() {
    let store = Store::in_memory();
    let settings = settings();
    register(&store, &settings, "alice@example.com").await;
    let api = routes::build(store, settings);

    let res = warp::test::request()
        .method("POST")
        .path("/session")
        .header("content-type", FORM)
        .body(format!("email=alice%40example.com&password={}", PASSWORD.replace(' ', "+")))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");
    let cookie = res.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("token="));

    let res = warp::test::request()
        .method("POST")
        .path("/session")
        .header("content-type", FORM)
        .body("email=alice%40example.com&password=nope")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body(&res).contains("Wrong email or password"));
}

#[tokio::test]
async fn register_form_signs_the_new_user_in() {
    let store = Store::in_memory();
    let api = routes::build(store.clone(), settings());

    let res = warp::test::request()
        .method("POST")
        .path("/session/register")
        .header("content-type", FORM)
        .body("email=dave%40example.com&password=pw&full_name=Dave")
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/dashboard");
    let profiles = store.get_profiles().await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].full_name.as_deref(), Some("Dave"));
}

#[tokio::test]
async fn sign_out_clears_the_cookie() {
    let api = routes::build(Store::in_memory(), settings());
    let res = warp::test::request()
        .method("POST")
        .path("/session/end")
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/login");
    let cookie = res.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn new_note_form_creates_and_redirects() {
    let store = Store::in_memory();
    let settings = settings();
    let alice = register(&store, &settings, "alice@example.com").await;
    let api = routes::build(store.clone(), settings);

    let res = warp::test::request()
        .method("POST")
        .path("/dashboard/notes")
        .header("cookie", alice.cookie())
        .header("content-type", FORM)
        .body("title=Hello&content=World&is_public=on")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");

    let notes = store.get_notes(NoteScope::OwnedBy(alice.profile.id)).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_public);

    let res = warp::test::request()
        .method("POST")
        .path("/dashboard/notes")
        .header("cookie", alice.cookie())
        .header("content-type", FORM)
        .body("title=&content=World")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body(&res).contains("Title and content are required"));
}

#[tokio::test]
async fn dashboard_lists_only_the_callers_notes_escaped() {
    let store = Store::in_memory();
    let settings = settings();
    let alice = register(&store, &settings, "alice@example.com").await;
    let bob = register(&store, &settings, "bob@example.com").await;
    for (owner, title) in [(&alice, "<b>mine</b>"), (&bob, "theirs")] {
        store
            .add_note(NewNote {
                title: title.to_string(),
                content: "c".to_string(),
                is_public: true,
                user_id: owner.profile.id,
            })
            .await
            .unwrap();
    }
    let api = routes::build(store, settings);

    let res = warp::test::request()
        .path("/dashboard")
        .header("cookie", alice.cookie())
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body(&res);
    assert!(html.contains("&lt;b&gt;mine&lt;/b&gt;"));
    assert!(!html.contains("<b>mine</b>"));
    assert!(!html.contains("theirs"));
}

#[tokio::test]
async fn delete_form_requires_the_confirm_field() {
    let store = Store::in_memory();
    let settings = settings();
    let alice = register(&store, &settings, "alice@example.com").await;
    let note = store
        .add_note(NewNote {
            title: "t".to_string(),
            content: "c".to_string(),
            is_public: false,
            user_id: alice.profile.id,
        })
        .await
        .unwrap();
    let api = routes::build(store.clone(), settings);
    let path = format!("/dashboard/notes/{}/delete", note.id);

    let res = warp::test::request()
        .method("POST")
        .path(&path)
        .header("cookie", alice.cookie())
        .header("content-type", FORM)
        .body("")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.get_notes(NoteScope::All).await.unwrap().len(), 1);

    let res = warp::test::request()
        .method("POST")
        .path(&path)
        .header("cookie", alice.cookie())
        .header("content-type", FORM)
        .body("confirm=true")
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/dashboard");
    assert!(store.get_notes(NoteScope::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_actions_keep_the_current_filter() {
    let store = Store::in_memory();
    let settings = settings();
    let admin = register(&store, &settings, ADMIN).await;
    let alice = register(&store, &settings, "alice@example.com").await;
    let note = store
        .add_note(NewNote {
            title: "Shopping".to_string(),
            content: "eggs".to_string(),
            is_public: false,
            user_id: alice.profile.id,
        })
        .await
        .unwrap();
    let api = routes::build(store.clone(), settings);

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/admin/notes/{}/visibility?q=shop%20ping&visibility=private", note.id))
        .header("cookie", admin.cookie())
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/admin?q=shop%20ping&visibility=private");
    assert!(store.get_note(note.id).await.unwrap().is_public);

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/admin/notes/{}?q=shop", note.id))
        .header("cookie", admin.cookie())
        .header("content-type", FORM)
        .body("title=Groceries&content=eggs+and+milk")
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/admin?q=shop&visibility=all");
    let edited = store.get_note(note.id).await.unwrap();
    assert_eq!(edited.title, "Groceries");
    assert_eq!(edited.content, "eggs and milk");
    assert_eq!(edited.user_id, alice.profile.id);

    let res = warp::test::request()
        .method("POST")
        .path(&format!("/admin/notes/{}/delete", note.id))
        .header("cookie", alice.cookie())
        .header("content-type", FORM)
        .body("confirm=true")
        .reply(&api)
        .await;
    assert_eq!(location(&res), "/admin?q=&visibility=all");
    assert!(store.get_notes(NoteScope::All).await.unwrap().is_empty());
}
