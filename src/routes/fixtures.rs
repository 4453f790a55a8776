use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::core::config::ClientSettings;
use crate::core::state::AppState;
use crate::types::response::Envelope;

pub(crate) async fn constant_routes() -> Json<Envelope<Value>> {
    Json(Envelope::ok("Routes fetched", constant_route_tree()))
}

pub(crate) async fn client_config(State(state): State<AppState>) -> Json<Envelope<ClientSettings>> {
    Json(Envelope::ok(
        "Config fetched",
        state.client_settings.as_ref().clone(),
    ))
}

fn constant_route_tree() -> Value {
    json!([
        {
            "name": "dashboard",
            "path": "/dashboard",
            "component": "basic",
            "children": [
                {
                    "name": "dashboard_analysis",
                    "path": "/dashboard/analysis",
                    "component": "self",
                    "meta": {
                        "title": "Analysis",
                        "requiresAuth": true,
                        "icon": "icon-park-outline:analysis"
                    }
                },
                {
                    "name": "dashboard_workbench",
                    "path": "/dashboard/workbench",
                    "component": "self",
                    "meta": {
                        "title": "Workbench",
                        "requiresAuth": true,
                        "icon": "icon-park-outline:workbench"
                    }
                }
            ],
            "meta": {
                "title": "Dashboard",
                "icon": "mdi:monitor-dashboard",
                "order": 1
            }
        },
        {
            "name": "document",
            "path": "/document",
            "component": "basic",
            "children": [
                {
                    "name": "document_vue",
                    "path": "/document/vue",
                    "component": "self",
                    "meta": {
                        "title": "Vue docs",
                        "requiresAuth": true,
                        "icon": "logos:vue"
                    }
                },
                {
                    "name": "document_vite",
                    "path": "/document/vite",
                    "component": "self",
                    "meta": {
                        "title": "Vite docs",
                        "requiresAuth": true,
                        "icon": "logos:vitejs"
                    }
                }
            ],
            "meta": {
                "title": "Documents",
                "icon": "mdi:file-document-multiple-outline",
                "order": 2
            }
        }
    ])
}
