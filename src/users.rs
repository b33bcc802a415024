use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, instrument};

use crate::constants::*;
use crate::database::{Db, Records};
use crate::error::{AppError, AppJson};
use crate::models::{
    BalanceSummary, HealthResponse, MessageResponse, NumberInput, PublicUser, SalaryPayload, User,
};

/// Parses a decimal field, rejecting missing or non-numeric input.
pub fn parse_decimal(value: Option<&NumberInput>, field_name: &str) -> Result<f64, AppError> {
    value
        .and_then(NumberInput::as_f64)
        .ok_or_else(|| AppError::validation(format!("{} must be a valid number", field_name)))
}

pub async fn get_public_user(db: &Records, user_id: &str) -> Result<PublicUser, AppError> {
    db.find_user_by_id(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or(AppError::UserNotFound)
}

/// Replaces the user's salary and returns the stored value.
pub async fn set_salary(
    db: &Records,
    user_id: &str,
    salary: Option<&NumberInput>,
) -> Result<f64, AppError> {
    let salary = db
        .modify_user(user_id, |user| {
            user.salary = parse_decimal(salary, "Salary")?;
            Ok(user.salary)
        })
        .await?;
    info!(%user_id, salary, "salary updated");
    Ok(salary)
}

pub fn summarize(user: &User) -> BalanceSummary {
    let total_expenses: f64 = user.expenses.iter().map(|e| e.amount).sum();
    BalanceSummary {
        salary: user.salary,
        total_expenses,
        remaining_balance: user.salary - total_expenses,
        expense_count: user.expenses.len(),
    }
}

pub async fn balance_summary(db: &Records, user_id: &str) -> Result<BalanceSummary, AppError> {
    let user = db
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(summarize(&user))
}

#[instrument(skip_all)]
pub async fn get_user(
    State(db): State<Db>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(get_public_user(&db, &user_id).await?))
}

#[instrument(skip_all)]
pub async fn get_summary(
    State(db): State<Db>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceSummary>, AppError> {
    Ok(Json(balance_summary(&db, &user_id).await?))
}

#[instrument(skip_all)]
pub async fn update_salary(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    AppJson(payload): AppJson<SalaryPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    set_salary(&db, &user_id, payload.salary.as_ref()).await?;

    Ok(Json(MessageResponse::ok(MSG_SALARY_UPDATED)))
}

/// Liveness check. Reports how many users exist and nothing about them.
#[instrument(skip_all)]
pub async fn health(State(db): State<Db>) -> Result<Json<HealthResponse>, AppError> {
    let users = db.load_users().await?;

    Ok(Json(HealthResponse {
        success: true,
        message: MSG_API_WORKING.to_string(),
        users_count: users.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Expense;

    fn expense(amount: f64) -> Expense {
        Expense {
            id: amount.to_string(),
            category: "misc".to_string(),
            amount,
            description: String::new(),
            date: "2024-01-10".to_string(),
        }
    }

    #[test]
    fn summary_subtracts_expenses_from_salary() {
        let user = User {
            id: "u1".to_string(),
            username: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: String::new(),
            salary: 5000.0,
            expenses: vec![expense(42.5), expense(100.0)],
            created_at: String::new(),
        };

        let summary = summarize(&user);

        assert_eq!(summary.total_expenses, 142.5);
        assert_eq!(summary.remaining_balance, 4857.5);
        assert_eq!(summary.expense_count, 2);
    }

    #[test]
    fn decimals_accept_numbers_and_numeric_strings() {
        assert_eq!(
            parse_decimal(Some(&NumberInput::Number(5000.0)), "Salary").unwrap(),
            5000.0
        );
        assert_eq!(
            parse_decimal(Some(&NumberInput::Text(" 42.5 ".to_string())), "Amount").unwrap(),
            42.5
        );
        assert_eq!(
            parse_decimal(Some(&NumberInput::Number(-10.0)), "Salary").unwrap(),
            -10.0
        );
    }

    #[test]
    fn decimals_reject_missing_and_garbage() {
        assert!(matches!(
            parse_decimal(None, "Salary"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_decimal(Some(&NumberInput::Text("abc".to_string())), "Salary"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_decimal(Some(&NumberInput::Text("NaN".to_string())), "Salary"),
            Err(AppError::Validation(_))
        ));
    }
}
