use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/ideas", idea_routes())
        .nest("/users", user_routes())
}

fn idea_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::idea::list_ideas,
            handlers::idea::create_idea
        ))
        .routes(routes!(
            handlers::idea::get_idea,
            handlers::idea::replace_idea,
            handlers::idea::update_idea,
            handlers::idea::delete_idea
        ))
        .routes(routes!(
            handlers::comment::list_comments,
            handlers::comment::create_comment
        ))
        .routes(routes!(handlers::comment::delete_comment))
        .routes(routes!(
            handlers::like::toggle_like,
            handlers::like::get_like_status,
            handlers::like::remove_like
        ))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::user_stats))
        .routes(routes!(handlers::user::me))
}
