mod common;

use transfer_client::{FileCredentialStore, Session};
use transfer_core::types::{PartnerKind, RideFilter};
use transfer_core::Identity;

#[tokio::test]
async fn driver_login_persists_and_logout_drops_the_token() {
    let (base, _db) = common::start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut session = Session::new(common::client(&base), FileCredentialStore::new(&path));
    let identity = session.login_driver("rui@atlantic.pt", "password123").await;
    assert!(identity.success, "{:?}", identity.error);
    assert!(matches!(identity.data, Some(Identity::Driver(ref d)) if d.name == "Rui Costa"));

    // Authenticated calls work straight away.
    let rides = session
        .client()
        .call(|api| api.driver().get_rides(Some(RideFilter::Today)))
        .await;
    assert!(rides.success);

    // A fresh process picks the session back up from disk.
    let mut restarted = Session::new(common::client(&base), FileCredentialStore::new(&path));
    assert!(restarted.restore().unwrap());
    assert!(matches!(restarted.identity(), Some(Identity::Driver(_))));
    let rides = restarted
        .client()
        .call(|api| api.driver().get_rides(None))
        .await;
    assert!(rides.success);

    // After logout the bearer header is gone and the server refuses.
    restarted.logout().unwrap();
    let rides = restarted
        .client()
        .call(|api| api.driver().get_rides(None))
        .await;
    assert!(!rides.success);
    assert_eq!(rides.error.as_deref(), Some("Unauthorized"));

    let mut again = Session::new(common::client(&base), FileCredentialStore::new(&path));
    assert!(!again.restore().unwrap());
    assert!(again.client().auth_token().is_none());
}

#[tokio::test]
async fn failed_login_leaves_session_signed_out() {
    let (base, _db) = common::start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(common::client(&base), FileCredentialStore::new(dir.path().join("s.json")));

    let env = session.login_customer("ana@example.pt", "wrong").await;
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("Invalid credentials"));
    assert!(!session.is_authenticated());
    assert!(session.client().auth_token().is_none());
}

#[tokio::test]
async fn partner_login_must_match_account_type() {
    let (base, _db) = common::start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(common::client(&base), FileCredentialStore::new(dir.path().join("s.json")));

    let wrong = session
        .login_partner("ops@atlantic.pt", "password123", PartnerKind::Affiliate)
        .await;
    assert!(!wrong.success);

    let ok = session
        .login_partner("ops@atlantic.pt", "password123", PartnerKind::Supplier)
        .await;
    assert!(ok.success, "{:?}", ok.error);
    match session.identity() {
        Some(Identity::Partner(user)) => assert_eq!(user.kind(), PartnerKind::Supplier),
        other => panic!("unexpected identity {other:?}"),
    }

    let dashboard = session.client().call(|api| api.partner().get_dashboard()).await;
    assert!(dashboard.success, "{:?}", dashboard.error);
}

#[tokio::test]
async fn customer_otp_signs_in() {
    let (base, _db) = common::start_server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(common::client(&base), FileCredentialStore::new(dir.path().join("s.json")));

    let sent = session.client().call(|api| api.customer().send_otp("+351912345678")).await;
    assert!(sent.success, "{:?}", sent.error);

    let bad = session.verify_customer_otp("+351912345678", "000000").await;
    assert!(!bad.success);

    let good = session.verify_customer_otp("+351912345678", "123456").await;
    assert!(good.success, "{:?}", good.error);
    assert!(matches!(session.identity(), Some(Identity::Customer(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_failed_envelope() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = common::client(&format!("http://{addr}"));
    let env = client.call(|api| api.common().get_airports(None)).await;
    assert!(!env.success);
    assert!(!env.error.unwrap_or_default().is_empty());
}
