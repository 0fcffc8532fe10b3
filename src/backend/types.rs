// src/backend/types.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberType {
    Pledge,
    Brother,
}

impl FromStr for MemberType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pledge" => Ok(MemberType::Pledge),
            "brother" => Ok(MemberType::Brother),
            other => Err(format!("unknown member type {:?} (pledge|brother)", other)),
        }
    }
}

/// Standing a member's dues are billed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "LOA")]
    Loa,
    #[serde(rename = "PART-TIME")]
    PartTime,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Loa => "LOA",
            MemberStatus::PartTime => "PART-TIME",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('_', "-").as_str() {
            "ACTIVE" => Ok(MemberStatus::Active),
            "LOA" => Ok(MemberStatus::Loa),
            "PART-TIME" => Ok(MemberStatus::PartTime),
            other => Err(format!("unknown status {:?} (ACTIVE|LOA|PART-TIME)", other)),
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub member_type: MemberType,
    pub pledge_class: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dues {
    pub total_due: f64,
    pub total_paid: f64,
    pub status: String,
}

/// A member as the backend reports it. `memberType` comes back in whatever
/// case it was stored, so it stays a string here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub member_type: String,
    pub pledge_class: String,
    #[serde(default, alias = "_id")]
    pub user_id: Option<String>,
    pub dues: Dues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub success: bool,
    pub member: Option<Member>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub user_id: String,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Committee {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activities: Vec<Activity>,
}

/// The backend stores whatever `activities` it was given, `null` included.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Committee {
    /// Planned spend across all activities.
    pub fn activity_total(&self) -> f64 {
        self.activities.iter().map(|a| a.cost).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetApproval {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    /// Listing path for requests in this state.
    pub fn list_path(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "requests",
            RequestStatus::Accepted => "requests/accepted",
            RequestStatus::Declined => "requests/declined",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "declined" => Ok(RequestStatus::Declined),
            other => Err(format!(
                "unknown request status {:?} (pending|accepted|declined)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    pub department: String,
    pub amount: f64,
    pub description: String,
    pub requester: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub department: Option<String>,
    pub amount: f64,
    pub description: Option<String>,
    pub requester: Option<String>,
    pub status: RequestStatus,
    pub date_submitted: Option<String>,
    pub date_processed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_member_uses_camel_case_on_the_wire() {
        let m = NewMember {
            name: "Ada".into(),
            member_type: MemberType::Pledge,
            pledge_class: "Omega".into(),
            user_id: "u1".into(),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({ "name": "Ada", "memberType": "Pledge", "pledgeClass": "Omega", "userId": "u1" })
        );
    }

    #[test]
    fn status_names_match_backend() {
        let update = StatusUpdate {
            user_id: "u1".into(),
            status: MemberStatus::PartTime,
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "userId": "u1", "status": "PART-TIME" })
        );
        assert_eq!("part_time".parse::<MemberStatus>(), Ok(MemberStatus::PartTime));
        assert_eq!("loa".parse::<MemberStatus>(), Ok(MemberStatus::Loa));
        assert!("retired".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn created_member_reads_mongo_id() {
        let m: Member = serde_json::from_value(json!({
            "_id": "u9",
            "name": "Bo",
            "memberType": "Brother",
            "pledgeClass": "ALPHA",
            "dues": { "totalDue": 250, "totalPaid": 0, "status": "ACTIVE" }
        }))
        .unwrap();
        assert_eq!(m.user_id.as_deref(), Some("u9"));
        assert_eq!(m.dues.total_due, 250.0);
    }

    #[test]
    fn committee_round_trips_activities() {
        let c = Committee {
            id: None,
            name: "Social".into(),
            budget: Some(500.0),
            activities: vec![
                Activity { name: "Mixer".into(), cost: 120.0 },
                Activity { name: "Formal".into(), cost: 300.0 },
            ],
        };
        let v = serde_json::to_value(&c).unwrap();
        assert!(v.get("_id").is_none());
        assert_eq!(v["activities"][1]["cost"], 300.0);
        assert_eq!(c.activity_total(), 420.0);
    }

    #[test]
    fn committee_with_null_activities_lists_as_empty() {
        let listing: Vec<Committee> = serde_json::from_str(
            r#"[{"_id":"x","name":"Social","budget":null,"activities":null},{"name":"Service"}]"#,
        )
        .unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id.as_deref(), Some("x"));
        assert!(listing[0].activities.is_empty());
        assert!(listing[1].activities.is_empty());
        assert_eq!(listing[0].activity_total(), 0.0);
    }
}
