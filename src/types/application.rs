// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    /// Any status this client does not know; shown but never acted on.
    #[serde(other)]
    Unknown,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pendiente",
            ApplicationStatus::Approved => "Aprobado",
            ApplicationStatus::Rejected => "Rechazado",
            ApplicationStatus::Unknown => "Desconocido",
        }
    }

    /// Whether moving to `target` is an action the UI offers from this state.
    /// The server decides whether the transition actually happens.
    pub fn offers(&self, target: ApplicationStatus) -> bool {
        match (self, target) {
            (ApplicationStatus::Unknown, _) => false,
            (_, ApplicationStatus::Pending | ApplicationStatus::Unknown) => false,
            (current, target) => *current != target,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job: Option<JobSummary>,
    #[serde(default)]
    pub worker: Option<WorkerSummary>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn job_title(&self) -> String {
        match &self.job {
            Some(JobSummary {
                title: Some(title), ..
            }) if !title.is_empty() => title.clone(),
            Some(job) => format!("Trabajo #{}", job.id),
            None => "Trabajo desconocido".to_string(),
        }
    }

    pub fn worker_name(&self) -> String {
        match &self.worker {
            Some(WorkerSummary {
                name: Some(name), ..
            }) if !name.is_empty() => name.clone(),
            Some(worker) => format!("Usuario #{}", worker.id),
            None => "—".to_string(),
        }
    }

    pub fn worker_email(&self) -> &str {
        self.worker
            .as_ref()
            .and_then(|w| w.email.as_deref())
            .unwrap_or("—")
    }
}

/// Replace the entry whose id matches `updated`, keeping every other entry and
/// the list order untouched. Returns false when no entry matched.
pub fn replace_by_id(applications: &mut [Application], updated: Application) -> bool {
    match applications.iter_mut().find(|a| a.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: i64, status: ApplicationStatus) -> Application {
        Application {
            id,
            status,
            job: Some(JobSummary {
                id: id * 10,
                title: None,
            }),
            worker: None,
            created_at: None,
        }
    }

    #[test]
    fn test_offered_transitions() {
        use ApplicationStatus::*;
        assert!(Pending.offers(Approved));
        assert!(Pending.offers(Rejected));
        assert!(!Approved.offers(Approved));
        assert!(Approved.offers(Rejected));
        assert!(!Rejected.offers(Rejected));
        assert!(Rejected.offers(Approved));
        assert!(!Approved.offers(Pending));
        assert!(!Rejected.offers(Pending));
        assert!(!Unknown.offers(Approved));
        assert!(!Unknown.offers(Rejected));
        assert!(!Pending.offers(Unknown));
    }

    #[test]
    fn test_unrecognized_status_keeps_the_row() {
        let list: Vec<Application> = serde_json::from_str(
            r#"[
                {"id": 1, "status": "approved"},
                {"id": 2, "status": "en_revision"},
                {"id": 3, "status": "rejected", "createdAt": "2025-05-01 10:00:00"},
                {"id": 4, "status": "pending", "createdAt": "ayer"}
            ]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 4);
        assert_eq!(list[0].status.label(), "Aprobado");
        assert_eq!(list[1].status, ApplicationStatus::Unknown);
        assert_eq!(list[1].status.label(), "Desconocido");
        assert_eq!(list[2].status.label(), "Rechazado");
        assert_eq!(
            list[2].created_at.map(|d| d.to_rfc3339()).as_deref(),
            Some("2025-05-01T10:00:00+00:00")
        );
        assert!(list[3].created_at.is_none());
    }

    #[test]
    fn test_replace_by_id_keeps_order_and_others() {
        let mut list = vec![
            app(1, ApplicationStatus::Pending),
            app(2, ApplicationStatus::Pending),
            app(3, ApplicationStatus::Rejected),
        ];
        let before = list.clone();

        assert!(replace_by_id(&mut list, app(2, ApplicationStatus::Approved)));

        assert_eq!(list.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list[0], before[0]);
        assert_eq!(list[1].status, ApplicationStatus::Approved);
        assert_eq!(list[2], before[2]);
    }

    #[test]
    fn test_replace_by_id_unknown_id() {
        let mut list = vec![app(1, ApplicationStatus::Pending)];
        assert!(!replace_by_id(&mut list, app(9, ApplicationStatus::Approved)));
        assert_eq!(list[0].status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_deserialize_admin_application() {
        let json = r#"{
            "id": 4,
            "status": "pending",
            "createdAt": "2025-03-02T08:00:00Z",
            "job": {"id": 7, "title": "Cocinero"},
            "worker": {"id": 3, "name": "Ana", "email": "ana@correo.com"}
        }"#;
        let app: Application = serde_json::from_str(json).unwrap();

        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.job_title(), "Cocinero");
        assert_eq!(app.worker_name(), "Ana");
        assert_eq!(app.worker_email(), "ana@correo.com");
    }

    #[test]
    fn test_display_fallbacks() {
        let app = app(5, ApplicationStatus::Approved);
        assert_eq!(app.job_title(), "Trabajo #50");
        assert_eq!(app.worker_name(), "—");
        assert_eq!(app.worker_email(), "—");
    }
}
