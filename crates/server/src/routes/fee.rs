use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use database::policy;
use database::services::fee::{CreateFee, FeeFilter, FeePatch, FeeService, RecordPayment};
use log::warn;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::fee::{
    CreateFeeRequest, FeeQueryParams, FeeRecordResponse, FeeResponse, RecordPaymentRequest,
    UpdateFeeRequest, UpdateFeeStatusRequest,
};
use crate::error::ApiError;
use crate::mailer::FeeReminder;
use crate::routes::FEE_MANAGERS;
use crate::state::AppState;

/// Get fee records, due date ascending
#[utoipa::path(
    get,
    path = "/api/fees",
    params(FeeQueryParams),
    responses(
        (status = 200, description = "Fee records with expanded references", body = [FeeResponse]),
        (status = 403, description = "Caller's role may not list fees")
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn get_fees(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<FeeQueryParams>,
) -> Result<Json<Vec<FeeResponse>>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fees = FeeService::list(
        &state.db,
        &actor,
        FeeFilter {
            student_id: params.student_id,
        },
    )
    .await?;
    Ok(Json(fees.into_iter().map(FeeResponse::from).collect()))
}

/// Create a pending fee record and send a best-effort reminder email
#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = CreateFeeRequest,
    responses(
        (status = 201, description = "Fee created", body = FeeResponse),
        (status = 400, description = "Student is not assigned to the course"),
        (status = 404, description = "Student or course not found")
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn create_fee(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateFeeRequest>,
) -> Result<(StatusCode, Json<FeeResponse>), ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let created = FeeService::create(
        &state.db,
        &actor,
        CreateFee {
            student_id: body.student_id,
            course_id: body.course_id,
            amount: body.amount,
            due_date: body.due_date,
            payment_method: body.payment_method,
            transaction_id: body.transaction_id,
            notes: body.notes,
        },
    )
    .await?;

    // The fee is durable at this point; reminder delivery is best-effort
    // and failures are only logged.
    if let (Some(mailer), Some(user), Some(course)) =
        (&state.mailer, &created.student_user, &created.course)
    {
        let reminder = FeeReminder {
            to_email: &user.email,
            student_name: &user.name,
            course_name: &course.name,
            amount: created.fee.amount,
            due_date: created.fee.due_date,
        };
        if let Err(err) = mailer.send_fee_reminder(&reminder).await {
            warn!("failed to send fee reminder email: {err}");
        }
    }

    Ok((StatusCode::CREATED, Json(FeeResponse::from(created))))
}

/// Update a fee's amount, due date or notes
#[utoipa::path(
    put,
    path = "/api/fees/{id}",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    request_body = UpdateFeeRequest,
    responses(
        (status = 200, description = "Fee updated", body = FeeRecordResponse),
        (status = 404, description = "Fee record not found")
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn update_fee(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateFeeRequest>,
) -> Result<Json<FeeRecordResponse>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fee = FeeService::update(
        &state.db,
        id,
        FeePatch {
            amount: body.amount,
            due_date: body.due_date,
            notes: body.notes,
        },
    )
    .await?;
    Ok(Json(FeeRecordResponse::from(fee)))
}

/// Record a payment against a fee
#[utoipa::path(
    post,
    path = "/api/fees/payment",
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = FeeRecordResponse),
        (status = 404, description = "Fee record not found")
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<RecordPaymentRequest>,
) -> Result<Json<FeeRecordResponse>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fee = FeeService::record_payment(
        &state.db,
        RecordPayment {
            fee_id: body.fee_id,
            paid_date: body.paid_date,
            payment_method: body.payment_method,
            transaction_id: body.transaction_id,
        },
    )
    .await?;
    Ok(Json(FeeRecordResponse::from(fee)))
}

/// Transition a fee's status
#[utoipa::path(
    patch,
    path = "/api/fees/{id}/status",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    request_body = UpdateFeeStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = FeeResponse),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Fee record not found")
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn update_fee_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateFeeStatusRequest>,
) -> Result<Json<FeeResponse>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fee = FeeService::update_status(&state.db, id, &body.status).await?;
    Ok(Json(FeeResponse::from(fee)))
}

/// Get all pending fees
#[utoipa::path(
    get,
    path = "/api/fees/pending",
    responses(
        (status = 200, description = "Pending fees, due date ascending", body = [FeeResponse])
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn get_pending_fees(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<FeeResponse>>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fees = FeeService::pending(&state.db).await?;
    Ok(Json(fees.into_iter().map(FeeResponse::from).collect()))
}

/// Get all overdue fees
#[utoipa::path(
    get,
    path = "/api/fees/overdue",
    responses(
        (status = 200, description = "Overdue fees, due date ascending", body = [FeeResponse])
    ),
    security(("jwt" = [])),
    tag = "Fees"
)]
pub async fn get_overdue_fees(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<FeeResponse>>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let fees = FeeService::overdue(&state.db).await?;
    Ok(Json(fees.into_iter().map(FeeResponse::from).collect()))
}
