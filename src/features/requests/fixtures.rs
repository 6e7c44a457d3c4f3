//! Sample Requests
//!
//! Deterministic demo data for the requests list.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Applicant, DocumentRequest, RequestStatus};

const NAMES: [&str; 8] = [
    "Maria Santos",
    "Jose Rizal Cruz",
    "Ana Reyes",
    "Pedro Bautista",
    "Liza Mendoza",
    "Ramon Garcia",
    "Carmela Villanueva",
    "Noel Aquino",
];

const DOCUMENT_TYPES: [(&str, Option<f64>); 5] = [
    ("barangay_clearance", Some(100.0)),
    ("cedula", Some(50.0)),
    ("business_permit", Some(1500.0)),
    ("birth_certificate", Some(155.0)),
    ("certificate_of_residency", None),
];

const PURPOSES: [&str; 3] = [
    "Employment",
    "Requirement for a scholarship application at the provincial capitol, to be submitted together with the certificate of good moral character",
    "Bank account opening",
];

/// `count` requests, one every six hours from 2024-01-02
pub fn sample_requests(count: usize) -> Vec<DocumentRequest> {
    let start = DateTime::parse_from_rfc3339("2024-01-02T08:00:00Z")
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default();

    (0..count)
        .map(|i| {
            let name = NAMES[i % NAMES.len()];
            let (document_type, fee) = DOCUMENT_TYPES[i % DOCUMENT_TYPES.len()];
            let status = RequestStatus::ALL[(i * 3) % RequestStatus::ALL.len()];
            let handle = name.to_lowercase().replace(' ', ".");
            DocumentRequest {
                id: (i + 1).to_string(),
                reference: format!("REQ-2024-{:04}", i + 1),
                applicant: Applicant {
                    name: name.to_string(),
                    email: (i % 4 != 3).then(|| format!("{handle}@mail.example")),
                    photo_url: (i % 3 == 0).then(|| format!("https://cdn.example/avatars/{handle}.png")),
                },
                document_type: document_type.to_string(),
                status,
                submitted_at: start + Duration::hours(6 * i as i64),
                fee,
                purpose: (i % 5 != 4).then(|| PURPOSES[i % PURPOSES.len()].to_string()),
                pickup_location: (status == RequestStatus::ReadyForPickup)
                    .then(|| "https://maps.google.com/?q=Municipal+Hall".to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_requests_are_unique_and_ordered() {
        let requests = sample_requests(30);
        assert_eq!(requests.len(), 30);
        assert_eq!(requests[29].reference, "REQ-2024-0030");
        assert!(requests.windows(2).all(|w| w[0].submitted_at < w[1].submitted_at));
        assert!(requests.iter().any(|r| r.pickup_location.is_some()));
    }
}
