//! Wire model of the review query endpoint.
//!
//! The endpoint answers anonymous callers with partially nulled payloads, so every
//! nested field is an `Option` (absent and `null` both become `None`) and the
//! accessors below are the only place that looks through them.

use serde::{Deserialize, Serialize};

pub const OPERATION_NAME: &str = "getReviews";
pub const RESOURCE_TYPE: &str = "WORK";
/// `errorType` of field-level errors that anonymous access always produces.
pub const UNAUTHORIZED: &str = "Unauthorized";

pub const REVIEWS_QUERY: &str = r#"
query getReviews($filters: BookReviewsFilterInput!, $pagination: PaginationInput) {
  getReviews(filters: $filters, pagination: $pagination) {
    ...BookReviewsFragment
    __typename
  }
}

fragment BookReviewsFragment on BookReviewsConnection {
  totalCount
  edges {
    node {
      ...ReviewCardFragment
      __typename
    }
    __typename
  }
  pageInfo {
    prevPageToken
    nextPageToken
    __typename
  }
  __typename
}

fragment ReviewCardFragment on Review {
  __typename
  id
  creator {
    ...ReviewerProfileFragment
    __typename
  }
  recommendFor
  updatedAt
  createdAt
  spoilerStatus
  lastRevisionAt
  text
  rating
  shelving {
    shelf {
      name
      displayName
      editable
      default
      actionType
      sortOrder
      webUrl
      __typename
    }
    taggings {
      tag {
        name
        webUrl
        __typename
      }
      __typename
    }
    webUrl
    __typename
  }
  likeCount
  viewerHasLiked
  commentCount
}

fragment ReviewerProfileFragment on User {
  id: legacyId
  imageUrlSquare
  isAuthor
  ...SocialUserFragment
  textReviewsCount
  viewerRelationshipStatus {
    isBlockedByViewer
    __typename
  }
  name
  webUrl
  contributor {
    id
    works {
      totalCount
      __typename
    }
    __typename
  }
  __typename
}

fragment SocialUserFragment on User {
  viewerRelationshipStatus {
    isFollowing
    isFriend
    __typename
  }
  followersCount
  __typename
}
"#;

// -- Request

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsRequest<'a> {
    pub operation_name: &'static str,
    pub variables: Variables<'a>,
    pub query: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Variables<'a> {
    pub filters: Filters<'a>,
    pub pagination: Pagination<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters<'a> {
    pub resource_type: &'static str,
    pub resource_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct Pagination<'a> {
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<&'a str>,
}

impl<'a> ReviewsRequest<'a> {
    pub fn new(
        work_id: &'a str,
        limit: usize,
        language: Option<&'a str>,
        after: Option<&'a str>,
    ) -> Self {
        Self {
            operation_name: OPERATION_NAME,
            variables: Variables {
                filters: Filters {
                    resource_type: RESOURCE_TYPE,
                    resource_id: work_id,
                    language_code: language,
                },
                pagination: Pagination { limit, after },
            },
            query: REVIEWS_QUERY,
        }
    }
}

// -- Response

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsResponse {
    pub data: Option<ReviewsData>,
    pub errors: Option<Vec<RemoteError>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsData {
    #[serde(rename = "getReviews")]
    pub get_reviews: Option<ReviewConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConnection {
    pub total_count: Option<u64>,
    pub edges: Option<Vec<Edge>>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Edge {
    pub node: Option<ReviewNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    pub id: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i64>,
    /// Epoch milliseconds.
    pub created_at: Option<f64>,
    pub creator: Option<Creator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub name: Option<String>,
    /// `null` for reviewers who are not catalogued authors.
    pub contributor: Option<Contributor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Contributor {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    pub error_type: Option<String>,
    pub message: Option<String>,
}

impl RemoteError {
    pub fn is_unauthorized(&self) -> bool {
        self.error_type.as_deref() == Some(UNAUTHORIZED)
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error_type.as_deref().unwrap_or("UnknownError"),
            self.message.as_deref().unwrap_or("")
        )
    }
}

impl ReviewsResponse {
    fn connection(&self) -> Option<&ReviewConnection> {
        self.data.as_ref()?.get_reviews.as_ref()
    }

    pub fn errors(&self) -> &[RemoteError] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Errors other than the expected field authorization ones.
    pub fn critical_errors(&self) -> impl Iterator<Item = &RemoteError> {
        self.errors().iter().filter(|err| !err.is_unauthorized())
    }

    pub fn edges(&self) -> &[Edge] {
        self.connection()
            .and_then(|conn| conn.edges.as_deref())
            .unwrap_or_default()
    }

    pub fn total_count(&self) -> u64 {
        self.connection()
            .and_then(|conn| conn.total_count)
            .unwrap_or(0)
    }

    /// The continuation cursor; an empty token counts as none.
    pub fn next_page_token(&self) -> Option<&str> {
        self.connection()?
            .page_info
            .as_ref()?
            .next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}
