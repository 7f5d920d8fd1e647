//! Object key layout.
//!
//! Every object lives under a purpose prefix: `policy_docs/` for knowledge
//! base source documents, `customer_policy/` for per-customer policy text and
//! `uploads/{category}/` for everything else.

/// Prefix of knowledge base source documents.
pub const POLICY_DOCS_PREFIX: &str = "policy_docs/";

/// Prefix of customer policies.
pub const CUSTOMER_POLICY_PREFIX: &str = "customer_policy/";

/// Prefix of general uploads.
pub const UPLOADS_PREFIX: &str = "uploads/";

/// Category used for uploads without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// `policy_docs/{file_name}`
pub fn policy_doc_key(file_name: &str) -> String {
    format!("{}{}", POLICY_DOCS_PREFIX, file_name)
}

/// `customer_policy/{customer_id}.txt`
pub fn customer_policy_key(customer_id: &str) -> String {
    format!("{}{}.txt", CUSTOMER_POLICY_PREFIX, customer_id)
}

/// `uploads/{category}/{file_id}_{file_name}`
pub fn upload_key(category: &str, file_id: &str, file_name: &str) -> String {
    let category = if category.trim().is_empty() {
        DEFAULT_CATEGORY
    } else {
        category.trim()
    };
    format!("{}{}/{}_{}", UPLOADS_PREFIX, category, file_id, file_name)
}

/// `customer_policy/{customer_id}_{file_name}`, the target of presigned policy uploads.
pub fn customer_upload_key(customer_id: &str, file_name: &str) -> String {
    format!("{}{}_{}", CUSTOMER_POLICY_PREFIX, customer_id, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_namespaces() {
        assert_eq!(policy_doc_key("auto.pdf"), "policy_docs/auto.pdf");
        assert_eq!(customer_policy_key("john_doe"), "customer_policy/john_doe.txt");
        assert_eq!(upload_key("claims", "abc", "photo.jpg"), "uploads/claims/abc_photo.jpg");
        assert_eq!(
            customer_upload_key("jane_smith", "policy.pdf"),
            "customer_policy/jane_smith_policy.pdf"
        );
    }

    #[test]
    fn test_blank_category_uses_default() {
        assert_eq!(upload_key("  ", "id", "a.txt"), "uploads/general/id_a.txt");
    }
}
