//! Prompt text sent to the model.

use medlens_core::{Claim, EvidenceItem};

/// Fixed system instruction: allowed-source policy plus the four-way verdict taxonomy.
pub const SYSTEM_PROMPT: &str = "You are a careful health-claims checker. Use ONLY WHO, CDC, NICE, Cochrane, PubMed. \
If strong evidence supports the claim, verdict='true'. If mixed/insufficient, 'uncertain'. \
If contradicted, 'false'. If exaggerated/misleading, 'misleading'. \
Return STRICT JSON: {verdict, reason, sources:[{title,url}]}. Keep it concise.";

/// Render evidence as one `- title url` bullet per line.
pub fn render_evidence(evidence: &[EvidenceItem]) -> String {
    evidence
        .iter()
        .map(|item| format!("- {} {}", item.title, item.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_prompt(claim: &Claim, evidence: &[EvidenceItem]) -> String {
    format!(
        "Claim: {}\nSOURCES:\n{}\nReturn JSON only.",
        claim,
        render_evidence(evidence)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_lists_evidence_as_bullets() {
        let claim = Claim::new("Garlic cures flu").unwrap();
        let evidence = vec![
            EvidenceItem::new("Influenza", "https://www.who.int/flu"),
            EvidenceItem::new("Flu treatment", "https://www.cdc.gov/flu/treatment"),
        ];
        assert_eq!(
            build_user_prompt(&claim, &evidence),
            "Claim: Garlic cures flu\nSOURCES:\n- Influenza https://www.who.int/flu\n- Flu treatment https://www.cdc.gov/flu/treatment\nReturn JSON only."
        );
    }

    #[test]
    fn user_prompt_without_evidence() {
        let claim = Claim::new("Garlic cures flu").unwrap();
        assert_eq!(
            build_user_prompt(&claim, &[]),
            "Claim: Garlic cures flu\nSOURCES:\n\nReturn JSON only."
        );
    }

    #[test]
    fn system_prompt_names_every_verdict() {
        for label in ["'true'", "'uncertain'", "'false'", "'misleading'"] {
            assert!(SYSTEM_PROMPT.contains(label));
        }
    }
}
