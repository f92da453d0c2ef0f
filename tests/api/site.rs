use std::sync::Arc;

use crate::helpers::{add_member, get_json_response_body, BrokenMemberStore, TestApp};
use member_registry::Frontends;
use test_context::test_context;

fn assert_redirects_home(response: &reqwest::Response) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .expect("missing location header"),
        "/"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_render_empty_listing(app: &mut TestApp) {
    let response = app.get_index(None).await;
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("No members registered yet."));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_create_member_and_redirect(app: &mut TestApp) {
    let response = app.post_form("/new", &[("name", "  Father Ted  ")]).await;
    assert_redirects_home(&response);

    let html = app.get_index(None).await.text().await.unwrap();
    assert!(html.contains("Father Ted"), "{html}");

    let body = get_json_response_body(app.get_members().await).await;
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.values().next().unwrap()["name"], "Father Ted");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_escape_member_names(app: &mut TestApp) {
    add_member(app, "<script>alert(1)</script>").await;
    let html = app.get_index(None).await.text().await.unwrap();
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_render_error_page_for_blank_name(app: &mut TestApp) {
    for form in [vec![("name", "   ")], vec![]] {
        let response = app.post_form("/new", &form).await;
        assert_eq!(response.status().as_u16(), 400);
        let html = response.text().await.unwrap();
        assert!(html.contains("Error 400"), "{html}");
        assert!(html.contains("Member name cannot be empty"), "{html}");
    }

    let body = get_json_response_body(app.get_members().await).await;
    assert!(body["results"].as_object().unwrap().is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_preselect_member_for_editing(app: &mut TestApp) {
    let id = add_member(app, "Dougal").await;

    let html = app.get_index(Some(&id)).await.text().await.unwrap();
    assert!(html.contains("Edit Dougal"), "{html}");
    assert!(html.contains(&format!("name=\"id\" value=\"{id}\"")));

    let response = app.get_index(Some("no-such-member")).await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(!response.text().await.unwrap().contains("Edit "));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_update_member_and_redirect(app: &mut TestApp) {
    let id = add_member(app, "Dougal").await;

    let response = app
        .post_form("/update", &[("id", id.as_str()), ("name", "Dougal McGuire")])
        .await;
    assert_redirects_home(&response);

    let body = get_json_response_body(app.get_member(&id).await).await;
    assert_eq!(body["results"][&id]["name"], "Dougal McGuire");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_invalid_updates(app: &mut TestApp) {
    let id = add_member(app, "Jack").await;

    let response = app.post_form("/update", &[("id", ""), ("name", "Drink")]).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post_form("/update", &[("id", id.as_str()), ("name", " ")]).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .post_form("/update", &[("id", "no-such-member"), ("name", "Drink")])
        .await;
    assert_eq!(response.status().as_u16(), 404);
    let html = response.text().await.unwrap();
    assert!(html.contains("no member with ID no-such-member"), "{html}");

    let response = app.get_member("no-such-member").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_delete_member_by_form_or_query(app: &mut TestApp) {
    let by_form = add_member(app, "Ted").await;
    let by_query = add_member(app, "Dougal").await;
    let kept = add_member(app, "Jack").await;

    let response = app.post_form("/delete", &[("id", by_form.as_str())]).await;
    assert_redirects_home(&response);

    let response = app
        .http_client
        .post(format!("{}/delete", &app.address))
        .query(&[("id", by_query.as_str())])
        .send()
        .await
        .expect("Failed to execute request");
    assert_redirects_home(&response);

    // Deleting again is harmless
    let response = app.post_form("/delete", &[("id", by_form.as_str())]).await;
    assert_redirects_home(&response);

    let body = get_json_response_body(app.get_members().await).await;
    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results.contains_key(&kept));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_delete_without_id(app: &mut TestApp) {
    let response = app.post_form("/delete", &[("id", " ")]).await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(response.text().await.unwrap().contains("Error 400"));
}

#[tokio::test]
async fn should_render_500_when_store_fails() {
    let app = TestApp::with_store(Arc::new(BrokenMemberStore)).await;

    let response = app.get_index(None).await;
    assert_eq!(response.status().as_u16(), 500);
    let html = response.text().await.unwrap();
    assert!(html.contains("Error 500"));
    assert!(html.contains("disk on fire"));

    let response = app.post_form("/new", &[("name", "Ada")]).await;
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn should_not_serve_site_when_disabled() {
    let app = TestApp::with_frontends(Frontends {
        api: true,
        site: false,
    })
    .await;

    assert_eq!(app.get_index(None).await.status().as_u16(), 404);
    assert_eq!(app.get_members().await.status().as_u16(), 200);
}
