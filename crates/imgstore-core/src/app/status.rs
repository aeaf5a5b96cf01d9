//! Status - admission 予算のスナップショット
//!
//! 読み取り専用。取得時に permit を消費しない。

use serde::{Deserialize, Serialize};

use crate::admission::{AdmissionGate, OperationClass};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub capacity: usize,
    pub available: usize,
    pub in_flight: usize,
}

/// Per-class view of the admission gate at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStatus {
    pub upload_or_read: BudgetStatus,
    pub list: BudgetStatus,
}

impl GatewayStatus {
    pub(crate) fn snapshot(gate: &AdmissionGate) -> Self {
        let budget = |class| {
            let capacity = gate.capacity(class);
            let available = gate.available(class);
            BudgetStatus {
                capacity,
                available,
                in_flight: capacity.saturating_sub(available),
            }
        };
        Self {
            upload_or_read: budget(OperationClass::UploadOrRead),
            list: budget(OperationClass::List),
        }
    }

    pub fn class(&self, class: OperationClass) -> BudgetStatus {
        match class {
            OperationClass::UploadOrRead => self.upload_or_read,
            OperationClass::List => self.list,
        }
    }

    pub fn available(&self, class: OperationClass) -> usize {
        self.class(class).available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn snapshot_counts_in_flight_permits() {
        let gate = AdmissionGate::new(3, 4);
        let cancel = CancellationToken::new();
        let _a = gate.acquire(OperationClass::UploadOrRead, &cancel).await.unwrap();
        let _b = gate.acquire(OperationClass::UploadOrRead, &cancel).await.unwrap();

        let status = GatewayStatus::snapshot(&gate);
        assert_eq!(
            status.upload_or_read,
            BudgetStatus { capacity: 3, available: 1, in_flight: 2 }
        );
        assert_eq!(status.list.in_flight, 0);
        assert_eq!(status.available(OperationClass::List), 4);
    }
}
