// tests/organisation_links_test.rs

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use case_backend::domain::audit_log_model::RESOURCE_TYPE_ORGANISATION;
use case_backend::domain::organisation_model::Model as OrganisationModel;
use case_backend::domain::permission::Permission;
use case_backend::repository::audit_log_repository::AuditLogRepository;
use case_backend::repository::organisation_repository::OrganisationRepository;
use common::app_helper::{setup_app, TestApp};
use common::request::{body_json, create_empty_request, create_request};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

/// リンク一覧APIの結果を組織名で返す
async fn link_names(app: &TestApp, token: &str, organisation: &str) -> Vec<String> {
    let (status, body) = send(
        app,
        create_empty_request("GET", &format!("/organisation/{}/links", organisation), token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|o| o["name"].as_str().unwrap().to_string())
        .collect()
}

/// ストア上の有向リンク（名前のペア）
async fn stored_links(app: &TestApp, organisation: &OrganisationModel) -> Vec<String> {
    OrganisationRepository::new(&app.db.connection)
        .neighbours(organisation.id)
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.name)
        .collect()
}

#[tokio::test]
async fn test_link_is_symmetric() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;

    let (status, _) = send(
        &app,
        create_empty_request(
            "POST",
            &format!("/organisation/soc/links/{}", partner.id),
            &admin.access_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(link_names(&app, &admin.access_token, "soc").await, vec!["partner"]);
    assert_eq!(link_names(&app, &admin.access_token, "partner").await, vec!["soc"]);

    // 2回目のリンクは冪等
    let (status, _) = send(
        &app,
        create_empty_request("POST", "/organisation/partner/links/soc", &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link_names(&app, &admin.access_token, "soc").await, vec!["partner"]);
    assert_eq!(stored_links(&app, &partner).await, vec!["soc"]);
}

#[tokio::test]
async fn test_link_rejections() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    app.seed_organisation("soc").await;
    let token = admin.access_token.clone();

    let cases = [
        ("/organisation/soc/links/soc", StatusCode::BAD_REQUEST),
        ("/organisation/soc/links/admin", StatusCode::BAD_REQUEST),
        ("/organisation/admin/links/soc", StatusCode::BAD_REQUEST),
        ("/organisation/soc/links/missing", StatusCode::NOT_FOUND),
        ("/organisation/missing/links/soc", StatusCode::NOT_FOUND),
    ];

    for (uri, expected) in cases {
        let (status, _) = send(&app, create_empty_request("POST", uri, &token)).await;
        assert_eq!(status, expected, "POST {}", uri);
    }

    assert!(link_names(&app, &token, "soc").await.is_empty());
}

#[tokio::test]
async fn test_unlink_without_link_is_not_found() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    let soc = app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;
    let cert = app.seed_organisation("cert").await;
    app.seed_link(&soc, &cert).await;

    let (status, body) = send(
        &app,
        create_empty_request("DELETE", "/organisation/soc/links/partner", &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Organisation soc is not linked to partner");

    // 状態は変わらない
    assert_eq!(stored_links(&app, &soc).await, vec!["cert"]);
    assert!(stored_links(&app, &partner).await.is_empty());

    let (status, _) = send(
        &app,
        create_empty_request("DELETE", "/organisation/soc/links/missing", &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_then_unlink_leaves_no_trace() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    let soc = app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;
    let token = admin.access_token.clone();

    let (status, _) = send(
        &app,
        create_empty_request("POST", "/organisation/soc/links/partner", &token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        create_empty_request("DELETE", "/organisation/partner/links/soc", &token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert!(link_names(&app, &token, "soc").await.is_empty());
    assert!(link_names(&app, &token, "partner").await.is_empty());
    assert!(stored_links(&app, &soc).await.is_empty());
    assert!(stored_links(&app, &partner).await.is_empty());

    let actions: Vec<String> = AuditLogRepository::new(&app.db.connection)
        .find_by_resource(RESOURCE_TYPE_ORGANISATION, soc.id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec!["organisation_linked"]);

    let actions: Vec<String> = AuditLogRepository::new(&app.db.connection)
        .find_by_resource(RESOURCE_TYPE_ORGANISATION, partner.id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec!["organisation_unlinked"]);
}

#[tokio::test]
async fn test_bulk_link_replaces_link_set() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    let a = app.seed_organisation("a").await;
    let b = app.seed_organisation("b").await;
    let c = app.seed_organisation("c").await;
    let token = admin.access_token.clone();

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": ["b", c.id.to_string()] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link_names(&app, &token, "a").await, vec!["b", "c"]);
    assert_eq!(link_names(&app, &token, "b").await, vec!["a"]);

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": ["c"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(stored_links(&app, &a).await, vec!["c"]);
    assert!(stored_links(&app, &b).await.is_empty());
    assert_eq!(stored_links(&app, &c).await, vec!["a"]);

    // 空リストで全て解除
    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(stored_links(&app, &a).await.is_empty());
    assert!(stored_links(&app, &c).await.is_empty());
}

#[tokio::test]
async fn test_bulk_link_failure_rolls_back() {
    let app = setup_app().await;
    let admin = app.admin_user("alice").await;
    let a = app.seed_organisation("a").await;
    let b = app.seed_organisation("b").await;
    let c = app.seed_organisation("c").await;
    app.seed_link(&a, &c).await;
    let token = admin.access_token.clone();

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": ["b", "missing"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": ["b", "a"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/a/links",
            &token,
            &json!({ "organisations": ["admin"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stored_links(&app, &a).await, vec!["c"]);
    assert!(stored_links(&app, &b).await.is_empty());

    let audit = AuditLogRepository::new(&app.db.connection)
        .find_by_user(admin.id)
        .await
        .unwrap();
    assert!(audit.is_empty());
}

#[tokio::test]
async fn test_link_operations_require_manage_organisation() {
    let app = setup_app().await;
    let soc = app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;
    let cert = app.seed_organisation("cert").await;
    app.seed_link(&soc, &cert).await;

    let local_manager = app
        .member_of("bob", &soc, &[Permission::ManageOrganisation])
        .await;
    let token = local_manager.access_token.clone();

    let (status, _) = send(
        &app,
        create_empty_request("POST", "/organisation/soc/links/partner", &token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        create_request(
            "POST",
            "/organisation/soc/links",
            &token,
            &json!({ "organisations": ["partner"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        create_empty_request("DELETE", "/organisation/soc/links/cert", &token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 存在しない組織でも権限エラーが先
    let (status, _) = send(
        &app,
        create_empty_request("POST", "/organisation/missing/links/soc", &token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(stored_links(&app, &soc).await, vec!["cert"]);
    assert!(stored_links(&app, &partner).await.is_empty());
}

#[tokio::test]
async fn test_list_links_of_foreign_organisation_is_empty() {
    let app = setup_app().await;
    let soc = app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;
    let cert = app.seed_organisation("cert").await;
    let other = app.seed_organisation("other").await;
    app.seed_link(&soc, &partner).await;
    app.seed_link(&cert, &other).await;

    let analyst = app.member_of("dave", &soc, &[]).await;

    assert_eq!(
        link_names(&app, &analyst.access_token, "soc").await,
        vec!["partner"]
    );
    // リンク先であっても所属していなければ空
    assert!(link_names(&app, &analyst.access_token, "partner")
        .await
        .is_empty());
    assert!(link_names(&app, &analyst.access_token, "cert").await.is_empty());
    assert!(link_names(&app, &analyst.access_token, "missing")
        .await
        .is_empty());

    // 管理組織のメンバーはどの組織でも参照できる
    let auditor = app.member_of("erin", &app.db.administration, &[]).await;
    assert_eq!(
        link_names(&app, &auditor.access_token, &cert.id.to_string()).await,
        vec!["other"]
    );
}

#[tokio::test]
async fn test_double_link_skips_existing_direction() {
    use case_backend::domain::organisation_link_model::ActiveModel as LinkActiveModel;
    use sea_orm::{ActiveModelTrait, Set};

    let app = setup_app().await;
    let soc = app.seed_organisation("soc").await;
    let partner = app.seed_organisation("partner").await;

    // 片方向だけ先に書き込まれた状態
    LinkActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        from_organisation_id: Set(soc.id),
        to_organisation_id: Set(partner.id),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&app.db.connection)
    .await
    .unwrap();

    let repo = OrganisationRepository::new(&app.db.connection);
    assert!(repo.double_link(soc.id, partner.id).await.unwrap());
    assert!(!repo.double_link(partner.id, soc.id).await.unwrap());

    assert_eq!(stored_links(&app, &soc).await, vec!["partner"]);
    assert_eq!(stored_links(&app, &partner).await, vec!["soc"]);
}
