use alloy::primitives::Address;
use prettytable::{Table, row};

use crate::{
    configs::global::{ARS_PER_TOKEN, BRL_PER_TOKEN},
    lifecycle::JobStatus,
    metadata::JobMeta,
    types::{Job, JobId, TokenInfo},
    utils::units::{format_token, token_to_f64},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Fund,
    Release,
    Apply,
}

impl JobAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobAction::Fund => "fund",
            JobAction::Release => "release",
            JobAction::Apply => "apply",
        }
    }
}

/// An on-chain job merged with its local metadata, seen by `viewer`.
#[derive(Debug, Clone)]
pub struct JobView {
    pub job: Job,
    pub meta: Option<JobMeta>,
    pub viewer: Option<Address>,
}

impl JobView {
    pub fn new(job: Job, meta: Option<JobMeta>, viewer: Option<Address>) -> Self {
        Self { job, meta, viewer }
    }

    pub fn is_client(&self) -> bool {
        self.viewer == Some(self.job.client)
    }

    /// Actions worth offering for the current status. This is only a hint,
    /// the contract may still reject the call if the status moved on.
    pub fn actions(&self) -> Vec<JobAction> {
        let mut actions = vec![];
        match (self.is_client(), self.job.status) {
            (true, JobStatus::Created) => actions.push(JobAction::Fund),
            (true, JobStatus::Assigned) => actions.push(JobAction::Release),
            (false, JobStatus::Funded) if self.viewer.is_some() => actions.push(JobAction::Apply),
            _ => {}
        }
        actions
    }

    pub fn offers(&self, action: JobAction) -> bool {
        self.actions().contains(&action)
    }

    pub fn title(&self) -> String {
        match &self.meta {
            Some(meta) if !meta.title.is_empty() => format!("{} (Job #{})", meta.title, self.job.id),
            _ => format!("Job #{}", self.job.id),
        }
    }

    pub fn render(&self, token: &TokenInfo) -> String {
        let job = &self.job;
        let amount = token_to_f64(job.amount, token.decimals);

        let mut lines = vec![format!("{} [{}]", self.title(), job.status)];
        if let Some(meta) = &self.meta {
            if !meta.description.is_empty() {
                lines.push(format!("  {}", meta.description));
            }
            if !meta.country.is_empty() {
                lines.push(format!("  Country:    {}", meta.country));
            }
        }
        lines.push(format!(
            "  Amount:     {} {}",
            format_token(job.amount, token.decimals),
            token.symbol
        ));
        lines.push(format!(
            "              ~{:.2} ARS | ~{:.2} BRL",
            amount * ARS_PER_TOKEN,
            amount * BRL_PER_TOKEN
        ));
        lines.push(format!("  Client:     {}", job.client));
        if job.has_freelancer() {
            lines.push(format!("  Freelancer: {}", job.freelancer));
        } else {
            lines.push("  Freelancer: Not assigned".to_owned());
        }
        lines.push(format!("  Token:      {}", job.token));

        match self.viewer {
            None => lines.push("  Connect a wallet to interact with this job".to_owned()),
            Some(_) => {
                let actions = self.actions();
                let names = if actions.is_empty() {
                    "none".to_owned()
                } else {
                    let names: Vec<&str> = actions.iter().map(JobAction::as_str).collect();
                    names.join(", ")
                };
                lines.push(format!("  Actions:    {names}"));
            }
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

/// One line of the job listing. `job` is `Err` when the chain could not be
/// queried, which is shown differently from a job that does not exist.
/// `token` describes the job's payment token when it could be read.
#[derive(Debug, Clone)]
pub struct ListingRow {
    pub id: JobId,
    pub meta: Option<JobMeta>,
    pub job: Result<Option<Job>, String>,
    pub token: Option<TokenInfo>,
}

/// `default_token` formats rows whose own token is unknown.
pub fn render_listing(rows: &[ListingRow], default_token: &TokenInfo) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["ID", "Title", "Country", "Amount", "Status", "Created"]);

    for listing in rows {
        let title = listing
            .meta
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_default();
        let country = listing
            .meta
            .as_ref()
            .map(|m| m.country.clone())
            .unwrap_or_default();
        let created = listing
            .meta
            .as_ref()
            .map(|m| m.created_at.clone())
            .unwrap_or_default();

        let token = listing.token.as_ref().unwrap_or(default_token);
        let (amount, status) = match &listing.job {
            Ok(Some(job)) => (
                format!("{} {}", format_token(job.amount, token.decimals), token.symbol),
                job.status.to_string(),
            ),
            Ok(None) => (
                listing
                    .meta
                    .as_ref()
                    .map(|m| format!("{} {}", m.value_usdc, token.symbol))
                    .unwrap_or_default(),
                "not on chain".to_owned(),
            ),
            Err(_) => (String::new(), "unavailable".to_owned()),
        };

        table.add_row(row![listing.id, title, country, amount, status, created]);
    }

    table
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address};

    use super::*;

    const CLIENT: Address = address!("0x00000000000000000000000000000000000000c1");
    const OTHER: Address = address!("0x0000000000000000000000000000000000000055");

    fn token() -> TokenInfo {
        TokenInfo {
            symbol: "mUSDC".into(),
            decimals: 6,
        }
    }

    fn job(status: JobStatus) -> Job {
        Job {
            id: JobId(42),
            client: CLIENT,
            freelancer: Address::ZERO,
            amount: U256::from(1_500_000u64),
            token: Address::repeat_byte(0x70),
            status,
        }
    }

    fn meta() -> JobMeta {
        JobMeta {
            id: JobId(42),
            title: "Landing page".into(),
            description: "One page site".into(),
            country: "BR".into(),
            value_usdc: 1.5,
            created_at: "2024-05-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn client_actions_follow_status() {
        let view = |status| JobView::new(job(status), None, Some(CLIENT));
        assert_eq!(view(JobStatus::Created).actions(), vec![JobAction::Fund]);
        assert!(view(JobStatus::Funded).actions().is_empty());
        assert_eq!(view(JobStatus::Assigned).actions(), vec![JobAction::Release]);
        assert!(view(JobStatus::Released).actions().is_empty());
    }

    #[test]
    fn non_client_can_only_apply_to_funded_jobs() {
        let view = |status, viewer| JobView::new(job(status), None, viewer);
        assert_eq!(
            view(JobStatus::Funded, Some(OTHER)).actions(),
            vec![JobAction::Apply]
        );
        assert!(view(JobStatus::Created, Some(OTHER)).actions().is_empty());
        assert!(view(JobStatus::Assigned, Some(OTHER)).actions().is_empty());
        // not connected
        assert!(view(JobStatus::Funded, None).actions().is_empty());
    }

    #[test]
    fn render_merges_metadata_and_chain() {
        let rendered = JobView::new(job(JobStatus::Created), Some(meta()), Some(CLIENT)).render(&token());
        assert!(rendered.starts_with("Landing page (Job #42) [Created]"));
        assert!(rendered.contains("One page site"));
        assert!(rendered.contains("1.5 mUSDC"));
        assert!(rendered.contains("~1500.00 ARS | ~7.50 BRL"));
        assert!(rendered.contains("Freelancer: Not assigned"));
        assert!(rendered.contains("Actions:    fund"));
        assert!(rendered.ends_with("fund\n"));
    }

    #[test]
    fn render_lists_no_actions_for_a_waiting_client() {
        let rendered = JobView::new(job(JobStatus::Funded), None, Some(CLIENT)).render(&token());
        assert!(rendered.contains("Actions:    none"));
        assert!(!rendered.contains("Country"));
    }

    #[test]
    fn render_without_metadata_or_wallet() {
        let mut assigned = job(JobStatus::Assigned);
        assigned.freelancer = OTHER;
        let rendered = JobView::new(assigned, None, None).render(&token());
        assert!(rendered.starts_with("Job #42 [Assigned]"));
        assert!(rendered.contains(&format!("Freelancer: {OTHER}")));
        assert!(rendered.contains("Connect a wallet"));
    }

    #[test]
    fn listing_distinguishes_missing_and_unavailable() {
        let rows = vec![
            ListingRow {
                id: JobId(42),
                meta: Some(meta()),
                job: Ok(Some(job(JobStatus::Funded))),
                token: None,
            },
            ListingRow {
                id: JobId(43),
                meta: None,
                job: Ok(None),
                token: None,
            },
            ListingRow {
                id: JobId(44),
                meta: None,
                job: Err("connection refused".into()),
                token: None,
            },
        ];

        let table = render_listing(&rows, &token()).to_string();
        assert!(table.contains("Landing page"));
        assert!(table.contains("Funded"));
        assert!(table.contains("not on chain"));
        assert!(table.contains("unavailable"));
    }
}
