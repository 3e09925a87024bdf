use crate::QueryPayload;
use crate::types::JsonMap;
use std::fmt::Write;

/// A GraphQL query together with the variables to send with it and the
/// means of interpreting the `"data"` of a successful response
pub trait Query {
    type Output;

    fn write_graphql<W: Write>(&self, s: W) -> std::fmt::Result;
    fn variables(&self) -> JsonMap;
    fn parse_response(&self, data: JsonMap) -> Result<Self::Output, serde_json::Error>;

    /// Assemble the request body for this query
    ///
    /// # Panics
    ///
    /// Panics if `write_graphql()` fails when writing to a `String`
    fn payload(&self) -> QueryPayload {
        let mut query = String::new();
        self.write_graphql(&mut query)
            .expect("writing to a string should not fail");
        QueryPayload {
            query,
            variables: self.variables(),
        }
    }
}
