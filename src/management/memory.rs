// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{Directory, DirectoryUser, ManagementResponse, MetadataPatch, UserMetadata};
use crate::common::{Error, Nickname, SubjectId};
use crate::nickname::nickname_query;
use async_trait::async_trait;
use hyper::StatusCode;
use serde_json::{json, Value};
use std::sync::Mutex;

/// An in-memory directory which records every call made to it.
#[derive(Default)]
pub(crate) struct MemoryDirectory {
    pub(crate) nicknames: Vec<Nickname>,
    pub(crate) queries: Mutex<Vec<String>>,
    pub(crate) search_status: Option<StatusCode>,
    pub(crate) update_statuses: Mutex<Vec<StatusCode>>,
    pub(crate) updates: Mutex<Vec<(SubjectId, MetadataPatch)>>,
}

impl MemoryDirectory {
    pub(crate) fn with_nicknames(nicknames: &[&str]) -> Self {
        Self {
            nicknames: nicknames.iter().map(|n| Nickname(n.to_string())).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub(crate) fn updates(&self) -> Vec<(SubjectId, MetadataPatch)> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.queries().len() + self.updates().len()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn search_users(
        &self,
        query: &str,
    ) -> Result<ManagementResponse<Vec<DirectoryUser>>, Error> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        if let Some(status) = self.search_status {
            return Ok(ManagementResponse {
                body: Vec::new(),
                error: Some("search unavailable".to_string()),
                status,
            });
        }
        let body = self
            .nicknames
            .iter()
            .filter(|nickname| nickname_query(nickname) == query)
            .map(|nickname| DirectoryUser {
                user_id: Some(SubjectId(format!("auth0|{nickname}"))),
                user_metadata: Some(UserMetadata {
                    full_name: None,
                    nickname: Some(nickname.clone()),
                }),
            })
            .collect();
        Ok(ManagementResponse {
            body,
            error: None,
            status: StatusCode::OK,
        })
    }

    async fn update_metadata(
        &self,
        subject: &SubjectId,
        patch: &MetadataPatch,
    ) -> Result<ManagementResponse<Value>, Error> {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push((subject.clone(), patch.clone()));
        }
        // Statuses are consumed in call order; once exhausted every update succeeds.
        let status = self
            .update_statuses
            .lock()
            .ok()
            .and_then(|mut statuses| (!statuses.is_empty()).then(|| statuses.remove(0)))
            .unwrap_or(StatusCode::OK);
        Ok(ManagementResponse {
            body: json!({ "user_id": subject.as_str() }),
            error: (!status.is_success()).then(|| "update refused".to_string()),
            status,
        })
    }
}
