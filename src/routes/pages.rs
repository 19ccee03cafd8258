use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use warp::http::{StatusCode, Uri};

use crate::routes::authentication::{
    create_account, expired_cookie, session_cookie, sign_in, AuthSettings,
};
use crate::routes::notes::{change_note, create_note, flip_visibility, remove_note};
use crate::routes::profile::{load_profile, Gate};
use crate::store::Store;
use crate::types::account::{Login, Registration, Session};
use crate::types::filter::{AdminFilter, VisibilityFilter};
use crate::types::note::{NotePatch, NoteScope};
use crate::types::profile::ProfileDirectory;
use crate::views;
use crate::views::admin_table::filter_query;
use crate::views::dashboard::DashboardState;
use crate::views::note_form::NoteForm;

pub type Page = Box<dyn warp::Reply>;

#[derive(Deserialize, Debug, Default)]
pub struct DashboardQuery {
    pub new: Option<String>,
    pub edit: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdminQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub visibility: VisibilityFilter,
    pub edit: Option<Uuid>,
}

impl AdminQuery {
    fn filter(&self) -> AdminFilter {
        AdminFilter {
            q: self.q.clone(),
            visibility: self.visibility,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct EditForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl EditForm {
    fn into_patch(self) -> NotePatch {
        NotePatch {
            title: Some(self.title),
            content: Some(self.content),
            is_public: None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

impl ConfirmForm {
    fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("true")
    }
}

fn redirect(path: &str) -> Page {
    let uri = path
        .parse::<Uri>()
        .unwrap_or_else(|_| Uri::from_static("/"));
    Box::new(warp::redirect::see_other(uri))
}

fn html(body: String) -> Page {
    Box::new(warp::reply::html(body))
}

/// Blocking alert for a failed mutation.
fn alert(e: &handle_errors::Error, back: &str) -> Page {
    warn!("mutation failed: {}", e);
    Box::new(warp::reply::with_status(
        warp::reply::html(views::alert(&e.public_message(), back)),
        StatusCode::UNPROCESSABLE_ENTITY,
    ))
}

fn loading() -> Page {
    Box::new(warp::reply::with_status(
        warp::reply::html(views::loading()),
        StatusCode::SERVICE_UNAVAILABLE,
    ))
}

fn admin_back(query: &AdminFilter) -> String {
    format!("/admin?{}", filter_query(query))
}

pub async fn index(session: Option<Session>) -> Result<Page, warp::Rejection> {
    match session {
        Some(_) => Ok(redirect("/dashboard")),
        None => Ok(redirect("/login")),
    }
}

pub async fn login_page(session: Option<Session>) -> Result<Page, warp::Rejection> {
    match session {
        Some(_) => Ok(redirect("/dashboard")),
        None => Ok(html(views::login::render(None))),
    }
}

fn signed_in(token: &str) -> Page {
    Box::new(warp::reply::with_header(
        warp::redirect::see_other(Uri::from_static("/dashboard")),
        "set-cookie",
        session_cookie(token),
    ))
}

fn login_failed(e: &handle_errors::Error) -> Page {
    Box::new(warp::reply::with_status(
        warp::reply::html(views::login::render(Some(&e.public_message()))),
        StatusCode::UNPROCESSABLE_ENTITY,
    ))
}

pub async fn sign_in_form(
    store: Store,
    settings: AuthSettings,
    login: Login,
) -> Result<Page, warp::Rejection> {
    match sign_in(&store, &settings, login).await {
        Ok(token) => Ok(signed_in(&token)),
        Err(e) => {
            warn!("sign in failed: {}", e);
            Ok(login_failed(&e))
        }
    }
}

pub async fn register_form(
    store: Store,
    settings: AuthSettings,
    registration: Registration,
) -> Result<Page, warp::Rejection> {
    let login = Login {
        email: registration.email.clone(),
        password: registration.password.clone(),
    };
    let result = match create_account(&store, &settings, registration).await {
        Ok(profile) => {
            info!("Account registered: {}", profile.email);
            sign_in(&store, &settings, login).await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(token) => Ok(signed_in(&token)),
        Err(e) => {
            error!("registration failed: {}", e);
            Ok(login_failed(&e))
        }
    }
}

pub async fn sign_out() -> Result<Page, warp::Rejection> {
    Ok(Box::new(warp::reply::with_header(
        warp::redirect::see_other(Uri::from_static("/login")),
        "set-cookie",
        expired_cookie(),
    )))
}

pub async fn dashboard(
    session: Option<Session>,
    store: Store,
    query: DashboardQuery,
) -> Result<Page, warp::Rejection> {
    let profile = match load_profile(&store, session).await {
        Gate::Ready(profile) => profile,
        Gate::Login => return Ok(redirect("/login")),
        Gate::Loading => return Ok(loading()),
    };

    let notes = match store.get_notes(NoteScope::OwnedBy(profile.id)).await {
        Ok(notes) => notes,
        Err(e) => {
            warn!("dashboard notes fetch failed: {}", e);
            Vec::new()
        }
    };
    let state = DashboardState {
        form_open: query.new.is_some(),
        editing: query.edit,
    };
    Ok(html(views::dashboard::render(&profile, &notes, state)))
}

pub async fn admin(
    session: Option<Session>,
    store: Store,
    query: AdminQuery,
) -> Result<Page, warp::Rejection> {
    match load_profile(&store, session).await {
        Gate::Ready(profile) if profile.is_admin => {}
        Gate::Ready(profile) => {
            info!(user_id = %profile.id, "non-admin sent back to dashboard");
            return Ok(redirect("/dashboard"));
        }
        Gate::Login => return Ok(redirect("/login")),
        Gate::Loading => return Ok(loading()),
    }

    let (notes, profiles) = tokio::join!(store.get_notes(NoteScope::All), store.get_profiles());
    let notes = notes.unwrap_or_else(|e| {
        warn!("admin notes fetch failed: {}", e);
        Vec::new()
    });
    let profiles = profiles.unwrap_or_else(|e| {
        warn!("admin profiles fetch failed: {}", e);
        Vec::new()
    });

    Ok(html(views::admin::render(
        &notes,
        &ProfileDirectory::new(profiles),
        &query.filter(),
        query.edit,
    )))
}

pub async fn create_note_form(
    session: Option<Session>,
    store: Store,
    form: NoteForm,
) -> Result<Page, warp::Rejection> {
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match create_note(&store, &session, form.into_draft()).await {
        Ok(_) => Ok(redirect("/dashboard")),
        Err(e) => Ok(alert(&e, "/dashboard?new=1")),
    }
}

pub async fn update_note_form(
    id: Uuid,
    session: Option<Session>,
    store: Store,
    form: EditForm,
) -> Result<Page, warp::Rejection> {
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match change_note(&store, &session, id, form.into_patch()).await {
        Ok(_) => Ok(redirect("/dashboard")),
        Err(e) => Ok(alert(&e, "/dashboard")),
    }
}

pub async fn delete_note_form(
    id: Uuid,
    session: Option<Session>,
    store: Store,
    form: ConfirmForm,
) -> Result<Page, warp::Rejection> {
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match remove_note(&store, &session, id, form.confirmed()).await {
        Ok(_) => Ok(redirect("/dashboard")),
        Err(e) => Ok(alert(&e, "/dashboard")),
    }
}

pub async fn admin_update_form(
    id: Uuid,
    query: AdminQuery,
    session: Option<Session>,
    store: Store,
    form: EditForm,
) -> Result<Page, warp::Rejection> {
    let back = admin_back(&query.filter());
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match change_note(&store, &session, id, form.into_patch()).await {
        Ok(_) => Ok(redirect(&back)),
        Err(e) => Ok(alert(&e, &back)),
    }
}

pub async fn admin_toggle_form(
    id: Uuid,
    query: AdminQuery,
    session: Option<Session>,
    store: Store,
) -> Result<Page, warp::Rejection> {
    let back = admin_back(&query.filter());
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match flip_visibility(&store, &session, id).await {
        Ok(_) => Ok(redirect(&back)),
        Err(e) => Ok(alert(&e, &back)),
    }
}

pub async fn admin_delete_form(
    id: Uuid,
    query: AdminQuery,
    session: Option<Session>,
    store: Store,
    form: ConfirmForm,
) -> Result<Page, warp::Rejection> {
    let back = admin_back(&query.filter());
    let session = match session {
        Some(session) => session,
        None => return Ok(redirect("/login")),
    };
    match remove_note(&store, &session, id, form.confirmed()).await {
        Ok(_) => Ok(redirect(&back)),
        Err(e) => Ok(alert(&e, &back)),
    }
}
