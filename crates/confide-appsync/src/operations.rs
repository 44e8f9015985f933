pub const LIST_CONFESSIONS: &str = r#"
query ListConfessions($limit: Int, $nextToken: String) {
  listConfessions(limit: $limit, nextToken: $nextToken) {
    items {
      id
      message
      createdAt
      status
    }
    nextToken
  }
}
"#;

pub const CREATE_CONFESSION: &str = r#"
mutation CreateConfession($message: String!) {
  createConfession(message: $message) {
    id
    message
    createdAt
    status
  }
}
"#;
