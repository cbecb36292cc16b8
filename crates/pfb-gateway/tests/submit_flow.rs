use pfb_core::{
    Field, Form, Gateway, GatewayError, HttpGateway, Msg, Network, SubmitRequest, Submission,
};
use pfb_gateway::{tx_hash, AppState};
use std::net::SocketAddr;

async fn start_gateway(start_height: u64) -> anyhow::Result<SocketAddr> {
    pfb_gateway::spawn("127.0.0.1:0".parse()?, AppState::new(start_height)).await
}

fn form_for(addr: SocketAddr, namespace_id: &str, data: &str) -> Form {
    let mut form = Form::new();
    form.update(Msg::Edit(Field::Domain, addr.ip().to_string()));
    form.update(Msg::Edit(Field::Port, addr.port().to_string()));
    form.update(Msg::Edit(Field::NamespaceId, namespace_id.to_string()));
    form.update(Msg::Edit(Field::Data, data.to_string()));
    form
}

/// Drive one submit cycle through the form the way the front ends do.
async fn submit(form: &mut Form, gw: &HttpGateway) {
    let out = form.update(Msg::Submit).expect("form should be valid");
    let result = gw
        .submit(&out.url, &out.body)
        .await
        .map_err(|e| e.to_string());
    form.update(Msg::Settled(result));
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let addr = start_gateway(1).await?;
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await?
        .json()
        .await?;
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn test_submit_pfd_success() -> anyhow::Result<()> {
    let addr = start_gateway(12345).await?;
    let gw = HttpGateway::new();
    let mut form = form_for(addr, " 0c204d39600fddd3 ", "deadbeef");

    submit(&mut form, &gw).await;

    let expected_hash = tx_hash(&SubmitRequest::new("0c204d39600fddd3", "deadbeef"));
    assert_eq!(
        form.submission(),
        &Submission::Succeeded {
            height: 12345,
            tx_hash: expected_hash
        }
    );
    assert!(!form.is_sending());
    Ok(())
}

#[tokio::test]
async fn test_submit_pfb_on_blockspacerace() -> anyhow::Result<()> {
    let addr = start_gateway(7).await?;
    let gw = HttpGateway::new();
    let mut form = form_for(addr, "0c204d39600fddd3", "f1f20ca8007e910a3bf8b2e61da0");
    form.update(Msg::SetNetwork(Network::BlockspaceRace));
    assert!(form.endpoint().ends_with("/submit_pfb"));

    submit(&mut form, &gw).await;
    assert_eq!(form.submission().height(), 7);

    // heights keep counting across submissions
    submit(&mut form, &gw).await;
    assert_eq!(form.submission().height(), 8);
    Ok(())
}

#[tokio::test]
async fn test_rejected_submission_surfaces_status_and_reason() -> anyhow::Result<()> {
    let addr = start_gateway(1).await?;
    let gw = HttpGateway::new();
    let mut form = form_for(addr, "abc", "deadbeef");

    submit(&mut form, &gw).await;

    assert_eq!(
        form.submission().error(),
        Some("Request failed with status code 400: namespace_id must be 16 hex characters")
    );
    assert_eq!(form.submission().height(), 0);
    assert_eq!(form.submission().tx_hash(), "");
    assert!(form.can_submit());
    Ok(())
}

#[tokio::test]
async fn test_unknown_path_is_status_error() -> anyhow::Result<()> {
    let addr = start_gateway(1).await?;
    let err = HttpGateway::new()
        .submit(
            &format!("http://{addr}/submit_nothing"),
            &SubmitRequest::new("0c204d39600fddd3", "deadbeef"),
        )
        .await
        .unwrap_err();
    match err {
        GatewayError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("expected status error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_node_fails_then_recovers() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let dead = listener.local_addr()?;
    drop(listener);

    let gw = HttpGateway::new();
    let mut form = form_for(dead, "0c204d39600fddd3", "deadbeef");
    submit(&mut form, &gw).await;
    assert!(form.submission().error().is_some());
    assert_eq!(form.submission().height(), 0);

    // point the same form at a live gateway and try again
    let addr = start_gateway(42).await?;
    form.update(Msg::Edit(Field::Port, addr.port().to_string()));
    submit(&mut form, &gw).await;
    assert_eq!(form.submission().error(), None);
    assert_eq!(form.submission().height(), 42);
    Ok(())
}
