use axum::{extract::State, response::Html};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::repo::User,
    error::AppResult,
    songs::repo::{list_by_user, Song},
    state::AppState,
};

const ADMIN_TEMPLATE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>mondegreen admin</title></head>
<body>
<h1>Users ({{count}})</h1>
{{#each users}}
<section>
  <h2>#{{id}} {{username}}</h2>
  {{#if songs}}
  <table>
    <tr><th>Title</th><th>Artist</th><th>Score</th><th>Cover</th></tr>
    {{#each songs}}
    <tr><td>{{title}}</td><td>{{artist}}</td><td>{{score}}</td><td>{{img_path}}</td></tr>
    {{/each}}
  </table>
  {{else}}
  <p>No songs yet.</p>
  {{/if}}
</section>
{{/each}}
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct AdminUser {
    id: i64,
    username: String,
    songs: Vec<Song>,
}

#[derive(Debug, Serialize)]
struct AdminPage {
    count: usize,
    users: Vec<AdminUser>,
}

#[instrument(skip(state))]
pub async fn admin(State(state): State<AppState>) -> AppResult<Html<String>> {
    let mut users = Vec::new();
    for user in User::list_all(&state.db).await? {
        let songs = list_by_user(&state.db, user.id).await?;
        users.push(AdminUser {
            id: user.id,
            username: user.username,
            songs,
        });
    }
    let page = AdminPage {
        count: users.len(),
        users,
    };
    Ok(Html(render_admin(&page)?))
}

fn render_admin(page: &AdminPage) -> anyhow::Result<String> {
    let hb = Handlebars::new();
    Ok(hb.render_template(ADMIN_TEMPLATE, page)?)
}
