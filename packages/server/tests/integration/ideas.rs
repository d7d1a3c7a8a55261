use serde_json::json;

use crate::common::{TestApp, routes};

mod idea_creation {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_create_an_idea() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .post_with_token(
                routes::IDEAS,
                &json!({
                    "title": "  Solar kiosks  ",
                    "description": "Charging stations for markets.",
                    "skills": ["hardware", "solar"],
                    "industries": ["energy"],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["title"], "Solar kiosks");
        assert_eq!(res.body["skills"], json!(["hardware", "solar"]));
        assert_eq!(res.body["author_id"], 1);
        assert_eq!(res.body["author"]["name"], "alice");
        assert_eq!(res.body["_count"]["likes"], 0);
        assert_eq!(res.body["_count"]["comments"], 0);
        assert_eq!(res.body["liked"], false);
    }

    #[tokio::test]
    async fn creating_without_a_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::IDEAS,
                &json!({"title": "Anon", "description": "No session"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn a_forged_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::IDEAS,
                &json!({"title": "Forged", "description": "Bad signature"}),
                "not-a-real-token",
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .post_with_token(
                routes::IDEAS,
                &json!({"title": "   ", "description": "Something"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get_without_token(routes::IDEAS).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn missing_description_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");

        let res = app
            .post_with_token(routes::IDEAS, &json!({"title": "Only a title"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod idea_listing {
    use super::*;

    #[tokio::test]
    async fn second_page_continues_after_the_first() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        for n in 1..=25 {
            app.create_idea(&token, &format!("Idea {n}")).await;
        }

        let res = app.get_without_token(&routes::ideas_page("2", "10")).await;

        assert_eq!(res.status, 200);
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["title"], "Idea 15");
        assert_eq!(items[9]["title"], "Idea 6");
        assert_eq!(res.body["pagination"]["total"], 25);
        assert_eq!(res.body["pagination"]["pages"], 3);
        assert_eq!(res.body["pagination"]["page"], 2);
        assert_eq!(res.body["pagination"]["limit"], 10);
    }

    #[tokio::test]
    async fn non_numeric_paging_falls_back_to_defaults() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        for n in 1..=12 {
            app.create_idea(&token, &format!("Idea {n}")).await;
        }

        let res = app.get_without_token(&routes::ideas_page("abc", "xyz")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["items"].as_array().unwrap().len(), 10);
        assert_eq!(res.body["items"][0]["title"], "Idea 12");
        assert_eq!(res.body["pagination"]["page"], 1);
        assert_eq!(res.body["pagination"]["limit"], 10);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        app.create_idea(&token, "Only idea").await;

        let res = app.get_without_token(&routes::ideas_page("5", "10")).await;

        assert_eq!(res.status, 200);
        assert!(res.body["items"].as_array().unwrap().is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["pagination"]["pages"], 1);
    }

    #[tokio::test]
    async fn largest_possible_page_is_empty_not_an_error() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        app.create_idea(&token, "Only idea").await;

        let res = app
            .get_without_token(&routes::ideas_page("18446744073709551615", "100"))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["items"].as_array().unwrap().is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn list_marks_ideas_the_caller_liked() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let liked = app.create_idea(&alice, "Liked").await;
        app.create_idea(&alice, "Not liked").await;
        app.toggle_like(liked, &bob).await;

        let res = app.get_with_token(routes::IDEAS, &bob).await;
        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items[0]["title"], "Not liked");
        assert_eq!(items[0]["liked"], false);
        assert_eq!(items[1]["liked"], true);
        assert_eq!(items[1]["_count"]["likes"], 1);

        let anon = app.get_without_token(routes::IDEAS).await;
        assert_eq!(anon.body["items"][1]["liked"], false);
    }
}

mod idea_retrieval {
    use super::*;

    #[tokio::test]
    async fn single_idea_includes_likers_and_counts() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let id = app.create_idea(&alice, "Detailed").await;
        app.toggle_like(id, &bob).await;
        app.create_comment(id, &bob, "Nice").await;

        let res = app.get_with_token(&routes::idea(id), &bob).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["_count"]["likes"], 1);
        assert_eq!(res.body["_count"]["comments"], 1);
        assert_eq!(res.body["likes"], json!([{"user_id": 2}]));
        assert_eq!(res.body["liked"], true);
    }

    #[tokio::test]
    async fn non_numeric_id_gets_a_json_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token("/api/v1/ideas/abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["error"].is_string(), "{}", res.text);
    }

    #[tokio::test]
    async fn unknown_idea_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::idea(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod idea_update {
    use super::*;

    #[tokio::test]
    async fn author_can_patch_a_single_field() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        let id = app.create_idea(&token, "Before").await;

        let res = app
            .patch_with_token(&routes::idea(id), &json!({"title": "After"}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "After");
        assert_eq!(res.body["description"], "An idea worth building.");
        assert_eq!(res.body["skills"], json!(["rust"]));
    }

    #[tokio::test]
    async fn author_can_replace_an_idea() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        let id = app.create_idea(&token, "Before").await;

        let res = app
            .put_with_token(
                &routes::idea(id),
                &json!({
                    "title": "Rewritten",
                    "description": "Fresh text",
                    "skills": [],
                    "industries": ["health"],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Rewritten");
        assert_eq!(res.body["skills"], json!([]));
        assert_eq!(res.body["industries"], json!(["health"]));
    }

    #[tokio::test]
    async fn empty_patch_returns_the_idea_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        let id = app.create_idea(&token, "Stable").await;

        let res = app
            .patch_with_token(&routes::idea(id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Stable");
    }

    #[tokio::test]
    async fn patch_with_blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.token_for(1, "alice");
        let id = app.create_idea(&token, "Keep me").await;

        let res = app
            .patch_with_token(&routes::idea(id), &json!({"title": "  "}), &token)
            .await;
        assert_eq!(res.status, 400);

        let get = app.get_without_token(&routes::idea(id)).await;
        assert_eq!(get.body["title"], "Keep me");
    }

    #[tokio::test]
    async fn non_author_cannot_update() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let id = app.create_idea(&alice, "Mine").await;

        let res = app
            .patch_with_token(&routes::idea(id), &json!({"title": "Stolen"}), &bob)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn updating_a_missing_idea_is_not_found_before_ownership() {
        let app = TestApp::spawn().await;
        let bob = app.token_for(2, "bob");

        let res = app
            .patch_with_token(&routes::idea(404), &json!({"title": "Ghost"}), &bob)
            .await;

        assert_eq!(res.status, 404);
    }
}

mod idea_deletion {
    use super::*;
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    use ideas_server::entity::{comment, like};

    #[tokio::test]
    async fn only_the_author_can_delete() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let id = app.create_idea(&alice, "Mine").await;

        let denied = app.delete_with_token(&routes::idea(id), &bob).await;
        assert_eq!(denied.status, 403);

        let ok = app.delete_with_token(&routes::idea(id), &alice).await;
        assert_eq!(ok.status, 200, "{}", ok.text);
        assert!(ok.body["message"].is_string());

        let gone = app.get_without_token(&routes::idea(id)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn deleting_an_idea_removes_its_comments_and_likes() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let bob = app.token_for(2, "bob");
        let carol = app.token_for(3, "carol");
        let id = app.create_idea(&alice, "Doomed").await;
        let other = app.create_idea(&alice, "Survivor").await;

        app.create_comment(id, &bob, "one").await;
        app.create_comment(id, &carol, "two").await;
        app.create_comment(other, &bob, "stays").await;
        app.toggle_like(id, &bob).await;
        app.toggle_like(id, &carol).await;
        app.toggle_like(other, &carol).await;

        let res = app.delete_with_token(&routes::idea(id), &alice).await;
        assert_eq!(res.status, 200);

        let comments = comment::Entity::find()
            .filter(comment::Column::IdeaId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        let likes = like::Entity::find()
            .filter(like::Column::IdeaId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(comments, 0);
        assert_eq!(likes, 0);

        let survivor = app.get_without_token(&routes::idea(other)).await;
        assert_eq!(survivor.body["_count"]["comments"], 1);
        assert_eq!(survivor.body["_count"]["likes"], 1);
    }

    #[tokio::test]
    async fn deleting_without_a_token_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.token_for(1, "alice");
        let id = app.create_idea(&alice, "Mine").await;

        let res = app.delete_without_token(&routes::idea(id)).await;

        assert_eq!(res.status, 401);
    }
}
