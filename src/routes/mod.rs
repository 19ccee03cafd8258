pub mod admin;
pub mod authentication;
pub mod notes;
pub mod pages;
pub mod profile;
pub mod realtime;

use handle_errors::return_error;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use warp::{http::Method, Filter};

use crate::realtime::Table;
use crate::store::Store;
use authentication::AuthSettings;

const FORM_LIMIT: u64 = 1024 * 64;

fn form<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form())
}

/// Every JSON, page and realtime route, with error recovery applied.
pub fn build(
    store: Store,
    settings: AuthSettings,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let settings_filter = {
        let settings = settings.clone();
        warp::any().map(move || settings.clone())
    };
    let auth = authentication::auth(settings.clone());
    let session = authentication::session(settings);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[Method::PUT, Method::DELETE, Method::GET, Method::POST]);

    // JSON API

    let registration = warp::post()
        .and(warp::path("registration"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(warp::body::json())
        .and_then(authentication::register);

    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(warp::body::json())
        .and_then(authentication::login);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and_then(authentication::logout);

    let get_profile = warp::get()
        .and(warp::path("profile"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(profile::get_profile);

    let get_notes = warp::get()
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(notes::get_notes);

    let get_public_notes = warp::get()
        .and(warp::path("notes"))
        .and(warp::path("public"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(notes::get_public_notes);

    let get_note = warp::get()
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(notes::get_note);

    let add_note = warp::post()
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(notes::add_note);

    let update_note = warp::put()
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(notes::update_note);

    let toggle_visibility = warp::put()
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("visibility"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(notes::toggle_visibility);

    let delete_note = warp::delete()
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and(warp::query::<notes::DeleteQuery>())
        .and_then(notes::delete_note);

    let admin_notes = warp::get()
        .and(warp::path("admin"))
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and(warp::query())
        .and_then(admin::get_notes);

    let admin_profiles = warp::get()
        .and(warp::path("admin"))
        .and(warp::path("profiles"))
        .and(warp::path::end())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(admin::get_profiles);

    let realtime = warp::path("realtime")
        .and(warp::path::param::<Table>())
        .and(warp::path::end())
        .and(warp::ws())
        .and(auth.clone())
        .and(store_filter.clone())
        .and_then(realtime::subscribe);

    // Pages

    let index = warp::get()
        .and(warp::path::end())
        .and(session.clone())
        .and_then(pages::index);

    let login_page = warp::get()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(session.clone())
        .and_then(pages::login_page);

    let sign_in_form = warp::post()
        .and(warp::path("session"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(form())
        .and_then(pages::sign_in_form);

    let register_form = warp::post()
        .and(warp::path("session"))
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(form())
        .and_then(pages::register_form);

    let sign_out = warp::post()
        .and(warp::path("session"))
        .and(warp::path("end"))
        .and(warp::path::end())
        .and_then(pages::sign_out);

    let dashboard = warp::get()
        .and(warp::path("dashboard"))
        .and(warp::path::end())
        .and(session.clone())
        .and(store_filter.clone())
        .and(warp::query())
        .and_then(pages::dashboard);

    let create_note_form = warp::post()
        .and(warp::path("dashboard"))
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(session.clone())
        .and(store_filter.clone())
        .and(form())
        .and_then(pages::create_note_form);

    let update_note_form = warp::post()
        .and(warp::path("dashboard"))
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(session.clone())
        .and(store_filter.clone())
        .and(form())
        .and_then(pages::update_note_form);

    let delete_note_form = warp::post()
        .and(warp::path("dashboard"))
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("delete"))
        .and(warp::path::end())
        .and(session.clone())
        .and(store_filter.clone())
        .and(form())
        .and_then(pages::delete_note_form);

    let admin_page = warp::get()
        .and(warp::path("admin"))
        .and(warp::path::end())
        .and(session.clone())
        .and(store_filter.clone())
        .and(warp::query())
        .and_then(pages::admin);

    let admin_update_form = warp::post()
        .and(warp::path("admin"))
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::query())
        .and(session.clone())
        .and(store_filter.clone())
        .and(form())
        .and_then(pages::admin_update_form);

    let admin_toggle_form = warp::post()
        .and(warp::path("admin"))
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("visibility"))
        .and(warp::path::end())
        .and(warp::query())
        .and(session.clone())
        .and(store_filter.clone())
        .and_then(pages::admin_toggle_form);

    let admin_delete_form = warp::post()
        .and(warp::path("admin"))
        .and(warp::path("notes"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path("delete"))
        .and(warp::path::end())
        .and(warp::query())
        .and(session)
        .and(store_filter)
        .and(form())
        .and_then(pages::admin_delete_form);

    let api = registration
        .or(login)
        .or(logout)
        .or(get_profile)
        .or(get_public_notes)
        .or(get_note)
        .or(get_notes)
        .or(add_note)
        .or(update_note)
        .or(toggle_visibility)
        .or(delete_note)
        .or(admin_notes)
        .or(admin_profiles)
        .or(realtime)
        .boxed();

    let pages = index
        .or(login_page)
        .or(sign_in_form)
        .or(register_form)
        .or(sign_out)
        .or(dashboard)
        .or(create_note_form)
        .or(update_note_form)
        .or(delete_note_form)
        .or(admin_page)
        .or(admin_update_form)
        .or(admin_toggle_form)
        .or(admin_delete_form)
        .boxed();

    api.or(pages)
        .with(warp::trace::request())
        .with(cors)
        .recover(return_error)
}
