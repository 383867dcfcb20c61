/**
 * API Routes
 *
 * Every `/api` endpoint, grouped by resource. Authentication is enforced by
 * the handlers themselves through the `AuthUser` extractor, so the routes
 * carry no middleware of their own.
 *
 * Static segments (`/api/events/date`, `/api/communities/user`) sit next to
 * parameter segments (`/api/events/{id}`); the router always prefers the
 * static match.
 */

use axum::routing::{get, post, put};
use axum::Router;

use crate::backend::auth;
use crate::backend::handlers::{communities, events, messaging, posts, users};
use crate::backend::server::state::AppState;

/// Configure all API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let router = configure_auth_routes(router);
    let router = configure_user_routes(router);
    let router = configure_event_routes(router);
    let router = configure_post_routes(router);
    let router = configure_community_routes(router);
    configure_message_routes(router)
}

/// `/api/auth` - registration, login and the caller's own account
fn configure_auth_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/users", get(auth::list_users))
        .route("/api/auth/verify", get(auth::verify))
        .route(
            "/api/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/api/auth/profile/role", put(auth::update_role))
        .route(
            "/api/auth/profile/{userId}",
            axum::routing::delete(auth::delete_account),
        )
}

/// `/api/users` - directory, profiles and the follow graph
fn configure_user_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/users", get(users::list_users))
        .route("/api/users/search/{username}", get(users::search_users))
        .route("/api/users/profile/{username}", get(users::profile_by_username))
        .route("/api/users/follow/{userId}", post(users::follow))
        .route("/api/users/unfollow/{userId}", post(users::unfollow))
        .route("/api/users/{id}", get(users::user_by_id))
}

/// `/api/events`
fn configure_event_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/user/{userId}", get(events::events_by_user))
        .route("/api/events/date", get(events::events_by_date))
        .route("/api/events/location", get(events::events_by_location))
        .route("/api/events/title", get(events::events_by_title))
        .route("/api/events/description", get(events::events_by_description))
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/{id}/related", get(events::related_events))
        .route("/api/events/{id}/join", post(events::join_event))
        .route("/api/events/{id}/leave", post(events::leave_event))
        .route("/api/events/{id}/like", post(events::like_event))
        .route("/api/events/{id}/comment", post(events::comment_on_event))
}

/// `/api/posts`
fn configure_post_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/user/{userId}", get(posts::posts_by_user))
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/posts/{id}/related", get(posts::related_posts))
        .route("/api/posts/{id}/like", post(posts::like_post))
        .route("/api/posts/{id}/comment", post(posts::comment_on_post))
}

/// `/api/communities` - CRUD, membership and community chat
fn configure_community_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/communities",
            get(communities::list_communities).post(communities::create_community),
        )
        .route("/api/communities/user", get(communities::my_communities))
        .route(
            "/api/communities/user/created",
            get(communities::my_created_communities),
        )
        .route(
            "/api/communities/user/{userId}",
            get(communities::communities_by_creator),
        )
        .route("/api/communities/join", post(communities::join_community))
        .route("/api/communities/leave", post(communities::leave_community))
        .route("/api/communities/messages", post(communities::send_chat_message))
        .route(
            "/api/communities/{communityId}",
            get(communities::get_community)
                .put(communities::update_community)
                .delete(communities::delete_community),
        )
        .route(
            "/api/communities/{communityId}/messages",
            get(communities::chat_messages),
        )
        .route("/api/communities/{communityId}/chatId", get(communities::chat_id))
        .route("/api/communities/{communityId}/members", get(communities::members))
}

/// `/api/messages` - direct conversations
fn configure_message_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/messages", post(messaging::send_message))
        .route(
            "/api/messages/conversations",
            post(messaging::get_or_create_conversation),
        )
        .route(
            "/api/messages/conversations/{userId}",
            get(messaging::conversation_partners),
        )
        .route(
            "/api/messages/conversation/{conversationId}",
            get(messaging::get_conversation),
        )
        .route(
            "/api/messages/{conversationId}",
            get(messaging::messages_by_conversation),
        )
}
