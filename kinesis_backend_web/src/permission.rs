// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device-orientation permission.
//!
//! Some browsers expose `DeviceOrientationEvent.requestPermission()`, which
//! must be called from a user gesture and resolves to `"granted"` or
//! `"denied"`. Others deliver orientation events without asking, and
//! desktop browsers may not have the event at all.

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_futures::JsFuture;

use kinesis_core::input::PermissionState;

fn orientation_constructor() -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str("DeviceOrientationEvent"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn request_function(constructor: &JsValue) -> Option<Function> {
    Reflect::get(constructor, &JsValue::from_str("requestPermission"))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// Returns the state orientation input starts in on this browser.
#[must_use]
pub fn initial_permission() -> PermissionState {
    match orientation_constructor() {
        None => PermissionState::Unsupported,
        Some(ctor) if request_function(&ctor).is_some() => PermissionState::Prompt,
        Some(_) => PermissionState::NotRequired,
    }
}

/// Asks the browser for orientation access.
///
/// Must be started from a user-gesture handler. Rejections and malformed
/// responses resolve to [`PermissionState::Denied`].
pub async fn request_permission() -> PermissionState {
    let Some(ctor) = orientation_constructor() else {
        return PermissionState::Unsupported;
    };
    let Some(request) = request_function(&ctor) else {
        return PermissionState::NotRequired;
    };
    let Ok(promise) = request.call0(&ctor).and_then(|v| v.dyn_into::<Promise>()) else {
        return PermissionState::Denied;
    };
    match JsFuture::from(promise).await {
        Ok(answer) if answer.as_string().as_deref() == Some("granted") => PermissionState::Granted,
        _ => PermissionState::Denied,
    }
}

/// Folds a request answer into the current state.
///
/// `NotRequired` and `Unsupported` mean there was nothing to ask, so they
/// only replace an open [`Prompt`](PermissionState::Prompt).
pub(crate) fn apply_answer(current: PermissionState, answer: PermissionState) -> PermissionState {
    match answer {
        PermissionState::NotRequired | PermissionState::Unsupported
            if current != PermissionState::Prompt =>
        {
            current
        }
        _ => answer,
    }
}
