use axum::{
    Json,
    extract::{Path, State},
};
use time::{OffsetDateTime, macros::format_description};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::required;
use crate::constants::*;
use crate::database::{Db, Records};
use crate::error::{AppError, AppJson};
use crate::models::{CreateExpensePayload, CreateExpenseResponse, Expense, MessageResponse};
use crate::users::parse_decimal;

/// Current UTC calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    OffsetDateTime::now_utc()
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Appends a new expense to the user's list and returns it.
pub async fn add_expense(
    db: &Records,
    user_id: &str,
    payload: CreateExpensePayload,
) -> Result<Expense, AppError> {
    let expense = db
        .modify_user(user_id, move |user| {
            let expense = Expense {
                id: Uuid::new_v4().to_string(),
                category: payload.category.unwrap_or_default(),
                amount: parse_decimal(payload.amount.as_ref(), "Amount")?,
                description: payload.description.unwrap_or_default(),
                date: required(payload.date).unwrap_or_else(today),
            };
            user.expenses.push(expense.clone());
            Ok(expense)
        })
        .await?;

    info!(%user_id, expense_id = %expense.id, "expense added");
    Ok(expense)
}

/// Removes the expense with `expense_id` from the user's list.
///
/// An unknown expense id is not an error; the snapshot is rewritten either
/// way. Returns whether anything was removed.
pub async fn remove_expense(
    db: &Records,
    user_id: &str,
    expense_id: &str,
) -> Result<bool, AppError> {
    let removed = db
        .modify_user(user_id, |user| {
            let before = user.expenses.len();
            user.expenses.retain(|e| e.id != expense_id);
            Ok(user.expenses.len() != before)
        })
        .await?;

    info!(%user_id, %expense_id, removed, "expense delete");
    Ok(removed)
}

#[instrument(skip_all)]
pub async fn create_expense(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    AppJson(payload): AppJson<CreateExpensePayload>,
) -> Result<Json<CreateExpenseResponse>, AppError> {
    let expense = add_expense(&db, &user_id, payload).await?;

    Ok(Json(CreateExpenseResponse {
        success: true,
        message: MSG_EXPENSE_ADDED.to_string(),
        expense_id: expense.id,
    }))
}

#[instrument(skip_all)]
pub async fn delete_expense(
    State(db): State<Db>,
    Path((user_id, expense_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    remove_expense(&db, &user_id, &expense_id).await?;

    Ok(Json(MessageResponse::ok(MSG_EXPENSE_DELETED)))
}
