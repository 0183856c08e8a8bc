use formula_actions::{CurrentUser, ErrorKind, FormulaActions};
use serde_json::{json, Value};

const OWNER: CurrentUser = CurrentUser { id: 10 };
const OTHER: CurrentUser = CurrentUser { id: 20 };

async fn call(
    actions: &FormulaActions,
    procedure: &str,
    caller: Option<&CurrentUser>,
    input: Value,
) -> Value {
    match actions.dispatch(procedure, caller, input).await {
        Ok(body) => body,
        Err(err) => err.to_body(),
    }
}

#[tokio::test]
async fn test_envelope_shapes() {
    let actions = FormulaActions::in_memory();

    let created = call(
        &actions,
        "formulaGroup.create",
        Some(&OWNER),
        json!({ "name": "Kinematics", "tags": ["motion"] }),
    )
    .await;
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["data"]["group"]["name"], json!("Kinematics"));
    assert_eq!(created["data"]["group"]["ownerId"], json!(10));
    assert_eq!(created["data"]["group"]["isActive"], json!(true));
    let group_id = created["data"]["group"]["id"].clone();

    let formula = call(
        &actions,
        "formula.create",
        Some(&OWNER),
        json!({
            "groupId": group_id,
            "name": "v=u+at",
            "expression": "v=u+at",
            "variables": [{ "symbol": "v", "meaning": "final velocity", "unit": "m/s" }],
            "difficulty": "intermediate"
        }),
    )
    .await;
    assert_eq!(
        formula["data"]["formula"]["difficulty"],
        json!("intermediate")
    );
    assert_eq!(
        formula["data"]["formula"]["variables"][0]["unit"],
        json!("m/s")
    );

    let listed = call(&actions, "formula.list", Some(&OTHER), Value::Null).await;
    assert_eq!(listed["success"], json!(true));
    assert_eq!(listed["data"]["count"], json!(1));
    assert_eq!(listed["data"]["formulas"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_update_and_upsert_through_dispatch() {
    let actions = FormulaActions::in_memory();
    let group = call(
        &actions,
        "formulaGroup.create",
        Some(&OWNER),
        json!({ "name": "Optics", "description": "Light" }),
    )
    .await;
    let group_id = group["data"]["group"]["id"].clone();

    let denied = call(
        &actions,
        "formulaGroup.update",
        Some(&OTHER),
        json!({ "id": group_id, "name": "Stolen" }),
    )
    .await;
    assert_eq!(denied["success"], json!(false));
    assert_eq!(denied["error"]["kind"], json!("FORBIDDEN"));

    let updated = call(
        &actions,
        "formulaGroup.update",
        Some(&OWNER),
        json!({ "id": group_id, "slug": "optics" }),
    )
    .await;
    assert_eq!(updated["data"]["group"]["slug"], json!("optics"));
    assert_eq!(updated["data"]["group"]["description"], json!("Light"));

    let formula = call(
        &actions,
        "formula.create",
        Some(&OWNER),
        json!({ "name": "n=c/v", "expression": "n=c/v" }),
    )
    .await;
    let formula_id = formula["data"]["formula"]["id"].clone();

    let state = call(
        &actions,
        "userFormulaState.upsert",
        Some(&OTHER),
        json!({ "formulaId": formula_id, "isFavorite": true }),
    )
    .await;
    assert_eq!(state["data"]["state"]["isFavorite"], json!(true));
    assert_eq!(state["data"]["state"]["familiarity"], json!("new"));

    let state = call(
        &actions,
        "userFormulaState.upsert",
        Some(&OTHER),
        json!({ "formulaId": formula_id, "familiarity": "mastered" }),
    )
    .await;
    assert_eq!(state["data"]["state"]["isFavorite"], json!(true));
    assert_eq!(state["data"]["state"]["familiarity"], json!("mastered"));

    let states = call(
        &actions,
        "userFormulaState.listMine",
        Some(&OTHER),
        json!({ "favoritesOnly": true }),
    )
    .await;
    assert_eq!(states["data"]["count"], json!(1));
}

#[tokio::test]
async fn test_dispatch_errors() {
    let actions = FormulaActions::in_memory();

    let unknown = actions
        .dispatch("formula.delete", Some(&OWNER), json!({}))
        .await
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    // Authentication is checked before the procedure name and the input.
    let anonymous_unknown = actions
        .dispatch("formula.delete", None, json!({}))
        .await
        .unwrap_err();
    assert_eq!(anonymous_unknown.kind(), ErrorKind::Unauthorized);

    let anonymous = actions
        .dispatch("formulaGroup.create", None, json!({ "name": 42 }))
        .await
        .unwrap_err();
    assert_eq!(anonymous.kind(), ErrorKind::Unauthorized);

    let wrong_type = actions
        .dispatch("formulaGroup.create", Some(&OWNER), json!({ "name": 42 }))
        .await
        .unwrap_err();
    assert_eq!(wrong_type.kind(), ErrorKind::Validation);

    let bad_literal = actions
        .dispatch(
            "formula.create",
            Some(&OWNER),
            json!({ "name": "x", "expression": "x", "difficulty": "expert" }),
        )
        .await
        .unwrap_err();
    assert_eq!(bad_literal.kind(), ErrorKind::Validation);

    let missing = actions
        .dispatch("formula.get", Some(&OWNER), json!({ "id": 5 }))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert_eq!(missing.to_string(), "formula 5 not found");

    let empty_patch = actions
        .dispatch("formula.update", Some(&OWNER), json!({ "id": 5 }))
        .await
        .unwrap_err();
    assert_eq!(empty_patch.kind(), ErrorKind::Validation);
}
