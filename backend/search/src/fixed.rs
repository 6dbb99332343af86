use async_trait::async_trait;

use medlens_core::{AllowList, Claim, EvidenceItem, EvidenceRetriever};

/// Serves the same evidence for every claim. Used offline and in tests.
pub struct StaticRetriever {
    items: Vec<EvidenceItem>,
    allow: AllowList,
}

impl StaticRetriever {
    pub fn new(items: Vec<EvidenceItem>) -> Self {
        Self {
            items,
            allow: AllowList::trusted(),
        }
    }
}

#[async_trait]
impl EvidenceRetriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn retrieve(&self, _claim: &Claim, max: usize) -> Vec<EvidenceItem> {
        self.allow.filter_evidence(self.items.iter().cloned(), max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn applies_allow_list_and_limit() {
        let retriever = StaticRetriever::new(vec![
            EvidenceItem::new("Spam", "https://example.com"),
            EvidenceItem::new("WHO", "https://www.who.int/a"),
            EvidenceItem::new("CDC", "https://www.cdc.gov/b"),
        ]);
        let claim = Claim::new("anything").unwrap();
        assert_eq!(
            retriever.retrieve(&claim, 1).await,
            vec![EvidenceItem::new("WHO", "https://www.who.int/a")]
        );
    }
}
