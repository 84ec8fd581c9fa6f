//! Wire types for the remote site's query endpoint and its REST problem list.
//!
//! Every field the remote may leave out or null is an `Option`, so a missing
//! payload surfaces as "not available" rather than a parse error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Body posted to the query endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    pub operation_name: &'static str,
    pub variables: Value,
    pub query: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

impl QueryBody {
    pub fn user_status() -> Self {
        Self {
            operation_name: "userStatus",
            variables: json!({}),
            query: USER_STATUS,
        }
    }

    pub fn question(slug: &str, verbose: bool) -> Self {
        Self {
            operation_name: "questionData",
            variables: json!({ "titleSlug": slug }),
            query: if verbose { QUESTION_VERBOSE } else { QUESTION },
        }
    }

    pub fn submissions(slug: &str, limit: u32, verbose: bool) -> Self {
        Self {
            operation_name: "submissions",
            variables: json!({
                "offset": 0,
                "limit": limit,
                "lastKey": null,
                "questionSlug": slug,
            }),
            query: if verbose {
                SUBMISSIONS_VERBOSE
            } else {
                SUBMISSIONS
            },
        }
    }

    pub fn submission_detail(id: &str, verbose: bool) -> Self {
        Self {
            operation_name: "mySubmissionDetail",
            variables: json!({ "id": id }),
            query: if verbose {
                SUBMISSION_DETAIL_VERBOSE
            } else {
                SUBMISSION_DETAIL
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusData {
    pub user_status: Option<UserStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub user_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionData {
    pub question: Option<Question>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub title: Option<String>,
    pub translated_title: Option<String>,
    pub translated_content: Option<String>,
    pub content: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListData {
    pub submission_list: Option<SubmissionList>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionList {
    #[serde(default)]
    pub submissions: Vec<SubmissionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub status_display: Option<String>,
    pub lang: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetailData {
    pub submission_detail: Option<SubmissionDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionDetail {
    pub code: Option<String>,
}

/// `GET api/problems/{book}/`
#[derive(Debug, Deserialize)]
pub struct ProblemList {
    #[serde(default)]
    pub stat_status_pairs: Vec<StatStatusPair>,
}

#[derive(Debug, Deserialize)]
pub struct StatStatusPair {
    pub stat: Stat,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Stat {
    #[serde(deserialize_with = "string_or_number")]
    pub frontend_question_id: String,
    #[serde(rename = "question__title")]
    pub title: Option<String>,
    #[serde(rename = "question__title_slug")]
    pub title_slug: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

const USER_STATUS: &str = "query userStatus {
  userStatus {
    userSlug
  }
}
";

const QUESTION: &str = "query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    translatedTitle
    translatedContent
    difficulty
  }
}
";

const QUESTION_VERBOSE: &str = "query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    categoryTitle
    boundTopicId
    title
    titleSlug
    content
    translatedTitle
    translatedContent
    isPaidOnly
    difficulty
    likes
    dislikes
    similarQuestions
    topicTags {
      name
      slug
      translatedName
    }
    codeSnippets {
      lang
      langSlug
      code
    }
    stats
    hints
    status
    sampleTestCase
    metaData
    exampleTestcases
  }
}
";

const SUBMISSIONS: &str = "query submissions($offset: Int!, $limit: Int!, $lastKey: String, $questionSlug: String!) {
  submissionList(offset: $offset, limit: $limit, lastKey: $lastKey, questionSlug: $questionSlug) {
    lastKey
    submissions {
      id
      statusDisplay
      lang
      timestamp
      url
    }
  }
}
";

const SUBMISSIONS_VERBOSE: &str = "query submissions($offset: Int!, $limit: Int!, $lastKey: String, $questionSlug: String!) {
  submissionList(offset: $offset, limit: $limit, lastKey: $lastKey, questionSlug: $questionSlug) {
    lastKey
    hasNext
    submissions {
      id
      statusDisplay
      lang
      runtime
      timestamp
      url
      isPending
      memory
    }
  }
}
";

const SUBMISSION_DETAIL: &str = "query mySubmissionDetail($id: ID!) {
  submissionDetail(submissionId: $id) {
    id
    code
    lang
  }
}
";

const SUBMISSION_DETAIL_VERBOSE: &str = "query mySubmissionDetail($id: ID!) {
  submissionDetail(submissionId: $id) {
    id
    code
    runtime
    memory
    statusDisplay
    timestamp
    lang
    passedTestCaseCnt
    totalTestCaseCnt
    sourceUrl
    question {
      titleSlug
      title
      translatedTitle
      questionId
    }
  }
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_payloads_should_deserialize_as_missing() {
        let env: Envelope<SubmissionDetailData> =
            serde_json::from_str(r#"{"data": {"submissionDetail": null}}"#).unwrap();
        assert!(env.data.unwrap().submission_detail.is_none());

        let env: Envelope<UserStatusData> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn problem_list_should_accept_numeric_ids() {
        let list: ProblemList = serde_json::from_value(json!({
            "stat_status_pairs": [
                {"stat": {"frontend_question_id": 1, "question__title": "Two Sum",
                          "question__title_slug": "two-sum"}, "status": "ac"},
                {"stat": {"frontend_question_id": "LCP 01", "question__title": "Guess",
                          "question__title_slug": "guess"}, "status": null},
            ]
        }))
        .unwrap();
        assert_eq!(list.stat_status_pairs[0].stat.frontend_question_id, "1");
        assert_eq!(list.stat_status_pairs[1].stat.frontend_question_id, "LCP 01");
        assert!(list.stat_status_pairs[1].status.is_none());
    }

    #[test]
    fn null_fields_should_not_break_the_payload() {
        let list: SubmissionListData = serde_json::from_value(json!({
            "submissionList": {"submissions": [
                {"id": 2, "statusDisplay": "Wrong Answer", "lang": null, "url": null},
                {"id": 1, "statusDisplay": "Accepted", "lang": "rust"},
            ]}
        }))
        .unwrap();
        let submissions = list.submission_list.unwrap().submissions;
        assert_eq!(submissions[0].lang, None);
        assert_eq!(submissions[1].lang.as_deref(), Some("rust"));

        let detail: SubmissionDetailData =
            serde_json::from_value(json!({"submissionDetail": {"code": null}})).unwrap();
        assert_eq!(detail.submission_detail.unwrap().code, None);

        let list: ProblemList = serde_json::from_value(json!({
            "stat_status_pairs": [
                {"stat": {"frontend_question_id": "3", "question__title": null,
                          "question__title_slug": null}, "status": "ac"},
            ]
        }))
        .unwrap();
        assert_eq!(list.stat_status_pairs[0].stat.title_slug, None);
    }

    #[test]
    fn query_body_should_use_wire_names() {
        let body = serde_json::to_value(QueryBody::submissions("two-sum", 40, false)).unwrap();
        assert_eq!(body["operationName"], "submissions");
        assert_eq!(body["variables"]["questionSlug"], "two-sum");
        assert_eq!(body["variables"]["limit"], 40);
        assert!(body["variables"]["lastKey"].is_null());
    }
}
