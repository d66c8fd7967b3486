// src/extractors/record.rs

// --- Imports ---
use crate::extractors::date::normalize_date;
use crate::extractors::dedup::OrderedUniqueMapping;
use crate::extractors::path::Node;
use crate::utils::error::ExtractError;
use serde_json::Value;

// --- Constants ---
const REPORT_ROOT: &str = "equifaxReport";
const CONTACT_INFO: &str = "IDAndContactInfo";

// --- Data Structures ---
/// Flat view of one bureau report. Missing data is always `""` or an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub consumer_name: String,
    pub gender: String,
    pub date_of_birth: String, // "YYYY-MM-DD HH:MM:SS" or ""
    pub age: String,
    pub pan_id: String,
    pub address: String,
    pub state: String,
    pub mobile: String,
    pub bureau_score: String,
    pub institutions: OrderedUniqueMapping,
    pub account_types: OrderedUniqueMapping,
    pub ownership_types: OrderedUniqueMapping,
}

/// Parses `text` as JSON and extracts it. Only malformed JSON fails.
pub fn extract_from_str(identifier: &str, text: &str) -> Result<ExtractedRecord, ExtractError> {
    let document: Value = serde_json::from_str(text).map_err(|source| ExtractError::Parse {
        identifier: identifier.to_string(),
        source,
    })?;
    Ok(extract(&document))
}

/// Pulls the report fields out of a parsed document.
///
/// Identity, address and phone lists take their last entry; score details
/// take the first. Scores arrive newest-first, identity history oldest-first.
pub fn extract(document: &Value) -> ExtractedRecord {
    let report = Node::new(document).key(REPORT_ROOT);
    if report.is_absent() {
        tracing::warn!("Document has no '{}' object; all fields will be empty", REPORT_ROOT);
    }
    let contact = report.key(CONTACT_INFO);
    let personal = contact.key("PersonalInfo");
    let address = contact.key("AddressInfo").last();

    let accounts = report.key("RetailAccountDetails").items();
    let account_field = |field: &str| {
        OrderedUniqueMapping::build(accounts.iter().map(|acc| Node::new(acc).key(field).raw_text()))
    };

    ExtractedRecord {
        consumer_name: personal.path(&["Name", "FullName"]).text(),
        gender: personal.key("Gender").text(),
        date_of_birth: personal
            .key("DateOfBirth")
            .as_str()
            .map(normalize_date)
            .unwrap_or_default(),
        age: personal.path(&["Age", "Age"]).text(),
        pan_id: contact.path(&["IdentityInfo", "PANId"]).last().key("IdNumber").text(),
        address: address.key("Address").text(),
        state: address.key("State").text(),
        mobile: contact.key("PhoneInfo").last().key("Number").text(),
        bureau_score: report.key("ScoreDetails").first().key("Value").text(),
        institutions: account_field("Institution"),
        account_types: account_field("AccountType"),
        ownership_types: account_field("OwnershipType"),
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_report() -> Value {
        json!({
            "equifaxReport": {
                "IDAndContactInfo": {
                    "PersonalInfo": {
                        "Name": { "FullName": "  ASHA KUMARI  " },
                        "DateOfBirth": "1985-03-12",
                        "Gender": "Female ",
                        "Age": { "Age": "39" }
                    },
                    "IdentityInfo": {
                        "PANId": [
                            { "seq": "1", "IdNumber": "OLDPN1234A" },
                            { "seq": "2", "IdNumber": "ABCPK1234F" }
                        ]
                    },
                    "AddressInfo": [
                        { "Address": "A1", "State": "S1" },
                        { "Address": "A2", "State": "S2" }
                    ],
                    "PhoneInfo": [
                        { "typeCode": "H", "Number": "0221234567" },
                        { "typeCode": "M", "Number": "9876543210" }
                    ]
                },
                "ScoreDetails": [ { "Value": 700 }, { "Value": 650 } ],
                "RetailAccountDetails": [
                    { "Institution": "Bank B", "AccountType": "Credit Card", "OwnershipType": "Individual" },
                    { "Institution": "Bank A", "AccountType": "Auto Loan", "OwnershipType": "Individual" },
                    { "Institution": "Bank B", "AccountType": "Credit Card" },
                    { "Institution": "", "AccountType": null, "OwnershipType": "Joint" }
                ]
            }
        })
    }

    #[test]
    fn extracts_every_field() {
        let record = extract(&full_report());

        assert_eq!(record.consumer_name, "ASHA KUMARI");
        assert_eq!(record.gender, "Female");
        assert_eq!(record.date_of_birth, "1985-03-12 00:00:00");
        assert_eq!(record.age, "39");
        assert_eq!(record.pan_id, "ABCPK1234F");
        assert_eq!(record.mobile, "9876543210");
        assert_eq!(record.institutions.render(), "{1: 'Bank A', 2: 'Bank B'}");
        assert_eq!(record.account_types.render(), "{1: 'Auto Loan', 2: 'Credit Card'}");
        assert_eq!(record.ownership_types.render(), "{1: 'Individual', 2: 'Joint'}");
    }

    #[test]
    fn last_address_wins() {
        let record = extract(&full_report());
        assert_eq!(record.address, "A2");
        assert_eq!(record.state, "S2");
    }

    #[test]
    fn first_score_wins_as_text() {
        let record = extract(&full_report());
        assert_eq!(record.bureau_score, "700");
    }

    #[test]
    fn missing_branches_yield_empty_fields() {
        let doc = json!({ "equifaxReport": { "IDAndContactInfo": { "PersonalInfo": {} } } });
        let record = extract(&doc);
        assert_eq!(record, ExtractedRecord::default());

        assert_eq!(extract(&json!({})), ExtractedRecord::default());
        assert_eq!(extract(&json!([])), ExtractedRecord::default());
        assert_eq!(extract(&json!(null)), ExtractedRecord::default());
    }

    #[test]
    fn empty_sequences_do_not_fail() {
        let doc = json!({
            "equifaxReport": {
                "IDAndContactInfo": {
                    "IdentityInfo": { "PANId": [] },
                    "AddressInfo": [],
                    "PhoneInfo": []
                },
                "ScoreDetails": [],
                "RetailAccountDetails": []
            }
        });
        let record = extract(&doc);
        assert_eq!(record.pan_id, "");
        assert_eq!(record.address, "");
        assert_eq!(record.mobile, "");
        assert_eq!(record.bureau_score, "");
        assert!(record.institutions.is_empty());
    }

    #[test]
    fn numeric_fields_are_stringified() {
        let doc = json!({
            "equifaxReport": {
                "IDAndContactInfo": {
                    "PersonalInfo": { "Age": { "Age": 41 } },
                    "PhoneInfo": [ { "Number": 9876543210u64 } ]
                },
                "RetailAccountDetails": [ { "Institution": 42 } ]
            }
        });
        let record = extract(&doc);
        assert_eq!(record.age, "41");
        assert_eq!(record.mobile, "9876543210");
        assert_eq!(record.institutions.render(), "{1: '42'}");
    }

    #[test]
    fn account_values_are_not_trimmed() {
        let doc = json!({
            "equifaxReport": {
                "RetailAccountDetails": [
                    { "Institution": "Bank A" },
                    { "Institution": "Bank A " },
                    { "Institution": " Bank B" },
                    { "Institution": "   " }
                ]
            }
        });
        let record = extract(&doc);

        assert_eq!(record.institutions.len(), 3);
        assert_eq!(record.institutions.render(), "{1: ' Bank B', 2: 'Bank A', 3: 'Bank A '}");
    }

    #[test]
    fn padded_score_is_trimmed() {
        let doc = json!({ "equifaxReport": { "ScoreDetails": [ { "Value": " 712 " } ] } });
        assert_eq!(extract(&doc).bureau_score, "712");
    }

    #[test]
    fn bad_dates_leave_dob_empty() {
        for dob in [json!(""), json!(null), json!("31-31-1985"), json!("unknown"), json!(19850312)] {
            let doc = json!({ "equifaxReport": { "IDAndContactInfo": { "PersonalInfo": { "DateOfBirth": dob } } } });
            assert_eq!(extract(&doc).date_of_birth, "", "DOB {:?} should normalize to empty", dob);
        }
    }

    #[test]
    fn malformed_text_is_a_parse_failure() {
        let err = extract_from_str("broken.json", "{ \"equifaxReport\": ").unwrap_err();
        match err {
            ExtractError::Parse { identifier, .. } => assert_eq!(identifier, "broken.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn well_formed_text_extracts() {
        let text = full_report().to_string();
        let record = extract_from_str("ok.json", &text).unwrap();
        assert_eq!(record.pan_id, "ABCPK1234F");
    }
}
