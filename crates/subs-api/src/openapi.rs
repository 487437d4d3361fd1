//! OpenAPI document for the subscriptions API.

use utoipa::OpenApi;

use crate::{error, list, subs};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "Subscriptions API",
    description = "Create, read, update, delete, list and sum user subscriptions.",
  ),
  paths(
    subs::create,
    subs::get_one,
    subs::update,
    subs::delete,
    list::list,
    list::sum,
  ),
  components(schemas(
    subs_core::subscription::SubscriptionWire,
    subs_core::store::SortColumn,
    subs::Message,
    subs::Created,
    list::SumResponse,
    error::ErrorBody,
  )),
  tags((name = "subs", description = "Subscription records")),
)]
pub struct ApiDoc;

/// The document served alongside the router.
pub fn openapi() -> utoipa::openapi::OpenApi { ApiDoc::openapi() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn documents_every_route() {
    let doc = openapi();
    let paths = &doc.paths.paths;
    for path in ["/subs/add", "/subs/{id}", "/subs/list", "/subs/sum"] {
      assert!(paths.contains_key(path), "missing {path}");
    }

    let item = &paths["/subs/{id}"];
    assert!(item.get.is_some() && item.put.is_some() && item.delete.is_some());
    assert!(paths["/subs/add"].post.is_some());
  }

  #[test]
  fn subscription_schema_uses_wire_field_names() {
    let json = serde_json::to_value(openapi()).unwrap();
    let props = &json["components"]["schemas"]["Subscription"]["properties"];
    for field in ["id", "uid", "name", "price", "start_date", "expires"] {
      assert!(props.get(field).is_some(), "missing {field}");
    }
  }
}
