//! Merge API:
//!   POST /api/merge       – multipart images + options, responds with PNG
//!   POST /api/merge/plan  – JSON sizes + options, responds with the layout plan

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use image_processor::{ContextPolicy, MergeError};
use merge_layout::{
    AlignmentDirective, GridOverflow, LayoutError, LayoutMode, MergeOptions, Size, plan_merge,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::Instrument;

use crate::app::SharedState;

use super::{err_json, invalid_input_json, merge_err_json, ok_json};

type ApiError = (StatusCode, Json<Value>);

/// Multipart fields of one merge request, collected before validation.
#[derive(Debug, Default)]
pub struct MergeForm {
    pub images: Vec<Bytes>,
    layout: Option<String>,
    rows: Option<u32>,
    cols: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    align: Option<String>,
    overflow: Option<String>,
    context: Option<String>,
}

impl MergeForm {
    /// True for field names that carry image bytes.
    pub fn is_image_field(name: &str) -> bool {
        matches!(name, "images" | "images[]" | "image")
    }

    /// Record one text field. Unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: &str) -> Result<(), LayoutError> {
        let value = value.trim();
        match name {
            "layout" => self.layout = non_empty(value),
            "rows" => self.rows = parse_dimension("rows", value)?,
            "cols" => self.cols = parse_dimension("cols", value)?,
            "width" => self.width = parse_dimension("width", value)?,
            "height" => self.height = parse_dimension("height", value)?,
            "align" => self.align = non_empty(value),
            "overflow" => self.overflow = non_empty(value),
            "context" => self.context = non_empty(value),
            other => tracing::debug!("Ignoring unknown merge field: {other}"),
        }
        Ok(())
    }

    /// Validated merge options. Independent of the number of images.
    pub fn options(&self) -> Result<MergeOptions, LayoutError> {
        let layout = LayoutMode::from_parts(self.layout.as_deref().unwrap_or(""), self.rows, self.cols)?;
        let alignment: AlignmentDirective = self.align.as_deref().unwrap_or("").parse()?;
        let overflow: GridOverflow = self.overflow.as_deref().unwrap_or("").parse()?;

        MergeOptions::builder()
            .layout(layout)
            .resize(self.width, self.height)
            .align(alignment)
            .grid_overflow(overflow)
            .build()
    }

    /// Context policy for this request, falling back to the server default.
    pub fn policy(&self, default: ContextPolicy) -> Result<ContextPolicy, LayoutError> {
        match self.context.as_deref() {
            Some(value) => value.parse().map_err(|_| LayoutError::UnknownValue {
                field: "context",
                value: value.to_string(),
            }),
            None => Ok(default),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_dimension(field: &'static str, value: &str) -> Result<Option<u32>, LayoutError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| LayoutError::UnknownValue {
            field,
            value: value.to_string(),
        })
}

async fn read_form(multipart: &mut Multipart) -> Result<MergeForm, ApiError> {
    let mut form = MergeForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(err_json(e.status().as_u16(), &e.body_text())),
        };
        let name = field.name().unwrap_or("").to_string();

        if MergeForm::is_image_field(&name) {
            let data = field
                .bytes()
                .await
                .map_err(|e| err_json(e.status().as_u16(), &e.body_text()))?;
            form.images.push(data);
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| err_json(e.status().as_u16(), &e.body_text()))?;
            form.set_text(&name, &text)
                .map_err(|e| merge_err_json(&MergeError::from(e)))?;
        }
    }

    Ok(form)
}

/// POST /api/merge
pub async fn merge_images(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("merge", %request_id);

    async move {
        let form = read_form(&mut multipart).await?;
        let options = form
            .options()
            .map_err(|e| merge_err_json(&MergeError::from(e)))?;
        options
            .validate(form.images.len())
            .map_err(|e| merge_err_json(&MergeError::from(e)))?;
        let policy = form
            .policy(state.dispatcher().policy())
            .map_err(|e| merge_err_json(&MergeError::from(e)))?;
        let dispatcher = state.dispatcher().with_policy(policy);

        tracing::info!(
            images = form.images.len(),
            layout = ?options.layout,
            alignment = ?options.alignment,
            ?policy,
            "Merge requested"
        );

        let permit = state
            .merge_slots()
            .acquire_owned()
            .await
            .map_err(|_| err_json(503, "Merge queue closed"))?;

        let images = form.images;
        let span = tracing::Span::current();
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            span.in_scope(|| {
                let sources: Vec<&[u8]> = images.iter().map(|b| b.as_ref()).collect();
                dispatcher.merge(&sources, &options)
            })
        })
        .await
        .map_err(|e| {
            tracing::error!("Merge task failed: {e}");
            err_json(500, "Merge task failed")
        })?;

        let output = result.map_err(|e| {
            tracing::warn!(kind = %e.kind(), "Merge failed: {e}");
            merge_err_json(&e)
        })?;

        let headers = [
            (header::CONTENT_TYPE.as_str(), "image/png".to_string()),
            ("x-merge-width", output.canvas.width.to_string()),
            ("x-merge-height", output.canvas.height.to_string()),
            ("x-merge-context", output.context.to_string()),
        ];
        Ok((headers, output.png).into_response())
    }
    .instrument(span)
    .await
}

/// Body of POST /api/merge/plan.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub options: MergeOptions,
}

/// POST /api/merge/plan
pub async fn plan_layout(
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|e| invalid_input_json(&e.body_text()))?;
    let plan = plan_merge(&body.sizes, &body.options)
        .map_err(|e| merge_err_json(&MergeError::from(e)))?;
    Ok(ok_json(json!(plan)))
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
