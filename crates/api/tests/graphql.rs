mod common;

use api::service::seed::{BACKOFFICE_EMAIL, MANAGER_EMAIL, SELLER_EMAIL};
use common::{TestContext, error_code};
use serde_json::json;

#[tokio::test]
async fn me_reports_roles_and_capabilities() {
    let ctx = TestContext::new_seeded().await;
    let query = r#"
        query Me {
            crm {
                me {
                    user { email displayRole roles }
                    capabilities { canViewSales canViewProcessing canEditProcessing canManageTeam }
                }
            }
        }
    "#;
    let resp = ctx.execute_as(BACKOFFICE_EMAIL, query, json!({})).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let me = &resp.data.into_json().unwrap()["crm"]["me"];
    assert_eq!(me["user"]["email"], BACKOFFICE_EMAIL);
    assert_eq!(me["user"]["roles"], json!(["backoffice"]));
    assert_eq!(me["capabilities"]["canViewSales"], false);
    assert_eq!(me["capabilities"]["canViewProcessing"], true);
    assert_eq!(me["capabilities"]["canEditProcessing"], true);
    assert_eq!(me["capabilities"]["canManageTeam"], false);
}

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let ctx = TestContext::new_seeded().await;
    let resp = ctx
        .execute_anonymous("{ crm { pipelineMetrics { openValueCents } } }")
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn sales_board_lists_requested_columns_in_order() {
    let ctx = TestContext::new_seeded().await;
    let query = r#"
        query Board($keys: [String!]) {
            crm {
                pipelineBoard(pipeline: SALES, columnKeys: $keys) {
                    pipeline
                    totalCount
                    totalValueCents
                    columns { key label totalCount totalValueCents proposals { companyName salesStatus } }
                }
            }
        }
    "#;
    let resp = ctx
        .execute_as(
            SELLER_EMAIL,
            query,
            json!({ "keys": ["awaiting_documentation", "proposta_enviada"] }),
        )
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let board = &resp.data.into_json().unwrap()["crm"]["pipelineBoard"];
    assert_eq!(board["pipeline"], "sales");
    assert_eq!(board["totalCount"], 2);
    assert_eq!(board["totalValueCents"], 24_950 + 25_500);
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns[0]["key"], "awaiting_documentation");
    assert_eq!(columns[0]["label"], "AG Documentação");
    assert_eq!(columns[0]["proposals"][0]["companyName"], "Beta Logística S.A.");
    assert_eq!(columns[1]["key"], "proposal_sent");
    assert_eq!(columns[1]["totalValueCents"], 25_500);
}

#[tokio::test]
async fn unknown_column_keys_fail_validation() {
    let ctx = TestContext::new_seeded().await;
    let query = r#"
        query {
            crm { pipelineBoard(pipeline: PROCESSING, columnKeys: ["nope"]) { totalCount } }
        }
    "#;
    let resp = ctx.execute_as(MANAGER_EMAIL, query, json!({})).await;
    assert_eq!(error_code(&resp).as_deref(), Some("VALIDATION_FAILED"));
}

#[tokio::test]
async fn processing_board_groups_every_state() {
    let ctx = TestContext::new_seeded().await;
    let query = r#"
        query {
            crm {
                processingBoard {
                    key
                    board { totalCount columns { key totalCount } }
                }
            }
        }
    "#;
    let resp = ctx.execute_as(BACKOFFICE_EMAIL, query, json!({})).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let groups = resp.data.into_json().unwrap()["crm"]["processingBoard"]
        .as_array()
        .cloned()
        .unwrap();
    let keys: Vec<_> = groups.iter().map(|g| g["key"].as_str().unwrap().to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "documentation",
            "analysis",
            "pending_items",
            "operational",
            "completion",
            "correction"
        ]
    );
    let columns: usize = groups
        .iter()
        .map(|g| g["board"]["columns"].as_array().unwrap().len())
        .sum();
    assert_eq!(columns, 22);
    assert_eq!(groups[1]["board"]["totalCount"], 1);
    assert_eq!(groups[4]["board"]["totalCount"], 1);
}

#[tokio::test]
async fn seller_processing_move_is_denied_with_stage_message() {
    let ctx = TestContext::new_seeded().await;
    let id = ctx.seeded.proposal_noted("Beta - migração filial").unwrap().id;
    let query = r#"
        mutation Move($id: ID!, $status: String!) {
            crm { moveProcessingStatus(id: $id, status: $status) { proposal { processingStatus } } }
        }
    "#;
    let resp = ctx
        .execute_as(
            SELLER_EMAIL,
            query,
            json!({ "id": id.to_string(), "status": "ativo" }),
        )
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("PERMISSION_DENIED"));
    assert_eq!(resp.errors[0].message, "seller cannot move at this stage");
}

#[tokio::test]
async fn manager_hand_off_through_graphql() {
    let ctx = TestContext::new_seeded().await;
    let id = ctx.seeded.proposal_noted("Beta - portabilidade").unwrap().id;
    let query = r#"
        mutation Move($id: ID!, $status: String!) {
            crm {
                moveSalesStatus(id: $id, status: $status) {
                    warnings
                    proposal { salesStatus processingStatus processingGroup sentToProcessingAt totalMonthlyCents }
                }
            }
        }
    "#;
    let resp = ctx
        .execute_as(
            MANAGER_EMAIL,
            query,
            json!({ "id": id.to_string(), "status": "sent_to_processing" }),
        )
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let payload = &resp.data.into_json().unwrap()["crm"]["moveSalesStatus"];
    assert_eq!(payload["warnings"], json!([]));
    assert_eq!(payload["proposal"]["salesStatus"], "sent_to_processing");
    assert_eq!(payload["proposal"]["processingStatus"], "troca_carteira");
    assert_eq!(payload["proposal"]["processingGroup"], "documentation");
    assert!(payload["proposal"]["sentToProcessingAt"].is_string());
    assert_eq!(payload["proposal"]["totalMonthlyCents"], 24_950);
}

#[tokio::test]
async fn unknown_status_key_fails_validation() {
    let ctx = TestContext::new_seeded().await;
    let id = ctx.seeded.proposal_noted("Alfa - linhas novas").unwrap().id;
    let query = r#"
        mutation Move($id: ID!) {
            crm { moveLegacyStatus(id: $id, status: "won") { proposal { status } } }
        }
    "#;
    let resp = ctx
        .execute_as(SELLER_EMAIL, query, json!({ "id": id.to_string() }))
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("VALIDATION_FAILED"));
}

#[tokio::test]
async fn legacy_signing_is_visible_in_history_and_metrics() {
    let ctx = TestContext::new_seeded().await;
    let id = ctx.seeded.proposal_noted("Alfa - diretoria").unwrap().id;
    let mutation = r#"
        mutation Sign($id: ID!) {
            crm { moveLegacyStatus(id: $id, status: "signed") { proposal { status companyStatus } } }
        }
    "#;
    let resp = ctx
        .execute_as(SELLER_EMAIL, mutation, json!({ "id": id.to_string() }))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let proposal = &resp.data.into_json().unwrap()["crm"]["moveLegacyStatus"]["proposal"];
    assert_eq!(proposal["status"], "signed");
    assert_eq!(proposal["companyStatus"], "Cliente Ativo");

    let query = r#"
        query History($id: ID!) {
            crm {
                proposalStatusHistory(proposalId: $id) { oldStatus newStatus }
                pipelineMetrics { closedCount averageValueCents totalCompanies }
            }
        }
    "#;
    let resp = ctx
        .execute_as(SELLER_EMAIL, query, json!({ "id": id.to_string() }))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let data = resp.data.into_json().unwrap();
    assert_eq!(
        data["crm"]["proposalStatusHistory"],
        json!([{ "oldStatus": "qualified", "newStatus": "signed" }])
    );
    assert_eq!(data["crm"]["pipelineMetrics"]["closedCount"], 2);
    assert_eq!(
        data["crm"]["pipelineMetrics"]["averageValueCents"],
        (159_800 + 9_000) / 2
    );
    assert_eq!(data["crm"]["pipelineMetrics"]["totalCompanies"], 3);
}

#[tokio::test]
async fn create_proposal_and_user_mutations() {
    let ctx = TestContext::new_seeded().await;
    let company = ctx.seeded.company_named("Gama Varejo Ltda").unwrap().id;
    let mutation = r#"
        mutation Create($input: NewProposalInput!) {
            crm {
                createProposal(input: $input) {
                    proposal { totalMonthlyCents salesStatus requestType donorCarrier }
                    warnings
                }
            }
        }
    "#;
    let resp = ctx
        .execute_as(
            SELLER_EMAIL,
            mutation,
            json!({ "input": {
                "companyId": company.to_string(),
                "lineQuantity": 12,
                "pricePerLineCents": 3_990,
                "requestType": "portability",
                "donorCarrier": "Oi"
            }}),
        )
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let payload = resp.data.into_json().unwrap()["crm"]["createProposal"].clone();
    assert_eq!(payload["warnings"], json!([]));
    let created = &payload["proposal"];
    assert_eq!(created["totalMonthlyCents"], 47_880);
    assert_eq!(created["salesStatus"], "proposal_sent");
    assert_eq!(created["requestType"], "portability");
    assert_eq!(created["donorCarrier"], "Oi");

    let create_user = r#"
        mutation {
            crm {
                createUser(input: { email: "pos@crm.test", fullName: "Paula Pós", roles: ["post_sale", "manager"] }) {
                    email displayRole roles roleLabels
                }
            }
        }
    "#;
    let denied = ctx.execute_as(SELLER_EMAIL, create_user, json!({})).await;
    assert_eq!(error_code(&denied).as_deref(), Some("PERMISSION_DENIED"));

    let resp = ctx.execute_as(MANAGER_EMAIL, create_user, json!({})).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let user = &resp.data.into_json().unwrap()["crm"]["createUser"];
    assert_eq!(user["displayRole"], "manager");
    assert_eq!(user["roles"], json!(["post_sale", "manager"]));
    assert_eq!(user["roleLabels"], json!(["Pós-Venda", "Gestor"]));
}

#[tokio::test]
async fn operational_board_and_move() {
    let ctx = TestContext::new_seeded().await;
    let gama = ctx.seeded.proposal_noted("Gama - frota completa").unwrap().id;
    let board_query = r#"
        query {
            crm {
                pipelineBoard(pipeline: OPERATIONAL) {
                    totalCount
                    columns { key label totalCount proposals { id operationalStatus } }
                }
            }
        }
    "#;
    let resp = ctx.execute_as(SELLER_EMAIL, board_query, json!({})).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let board = resp.data.into_json().unwrap()["crm"]["pipelineBoard"].clone();
    let keys: Vec<_> = board["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["analysis", "documentation", "activation", "completed"]);
    assert_eq!(board["totalCount"], 1);
    assert_eq!(board["columns"][2]["label"], "Ativação");
    assert_eq!(board["columns"][2]["proposals"][0]["id"], gama.to_string());

    let mutation = r#"
        mutation Move($id: ID!) {
            crm { moveOperationalStatus(id: $id, status: "completed") { proposal { status operationalStatus } warnings } }
        }
    "#;
    let resp = ctx
        .execute_as(BACKOFFICE_EMAIL, mutation, json!({ "id": gama.to_string() }))
        .await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let moved = &resp.data.into_json().unwrap()["crm"]["moveOperationalStatus"];
    assert_eq!(moved["proposal"]["status"], "signed");
    assert_eq!(moved["proposal"]["operationalStatus"], "completed");

    let open = ctx.seeded.proposal_noted("Alfa - linhas novas").unwrap().id;
    let resp = ctx
        .execute_as(SELLER_EMAIL, mutation, json!({ "id": open.to_string() }))
        .await;
    assert_eq!(error_code(&resp).as_deref(), Some("VALIDATION_FAILED"));
}

#[tokio::test]
async fn vocabulary_lists_processing_states_with_groups() {
    let ctx = TestContext::new_seeded().await;
    let query = r#"
        query { crm { pipelineVocabulary(pipeline: PROCESSING) { key label position isTerminal group } } }
    "#;
    let resp = ctx.execute_as(SELLER_EMAIL, query, json!({})).await;
    assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
    let states = resp.data.into_json().unwrap()["crm"]["pipelineVocabulary"]
        .as_array()
        .cloned()
        .unwrap();
    assert_eq!(states.len(), 22);
    assert_eq!(states[0]["key"], "troca_carteira");
    assert_eq!(states[0]["group"], "documentation");
    let ativo = states.iter().find(|s| s["key"] == "ativo").unwrap();
    assert_eq!(ativo["isTerminal"], true);
    assert_eq!(ativo["position"], 6);
}
