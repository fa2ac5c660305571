use crate::core::negotiation::ResponseFormat;
use crate::domain::model::{ErrorEntry, ResponseItem, RoutingResponse};
use crate::utils::error::{GatewayError, Result};
use quick_xml::se::Serializer;
use serde::Serialize;

pub const XML_NAMESPACE: &str = "http://www.de4a.eu/2020/ial/v2";
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub body: Vec<u8>,
    pub format: ResponseFormat,
}

impl RenderedResponse {
    pub fn content_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[derive(Serialize)]
#[serde(rename = "ResponseLookupRoutingInformation")]
struct XmlDocument<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "ResponseItem")]
    items: &'a [ResponseItem],
    #[serde(rename = "Error")]
    errors: &'a [ErrorEntry],
}

pub fn render(response: &RoutingResponse, format: ResponseFormat) -> Result<RenderedResponse> {
    let body = match format {
        ResponseFormat::Xml => {
            tracing::debug!("Rendering response as XML");
            to_xml(response)?
        }
        ResponseFormat::Json => {
            tracing::debug!("Rendering response as JSON");
            to_json(response)?
        }
    };
    Ok(RenderedResponse { body, format })
}

fn to_xml(response: &RoutingResponse) -> Result<Vec<u8>> {
    let document = XmlDocument {
        xmlns: XML_NAMESPACE,
        items: &response.items,
        errors: &response.errors,
    };

    let mut xml = String::new();
    let mut serializer = Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| GatewayError::internal(format!("Failed to serialize XML response: {}", e)))?;

    if xml.is_empty() {
        return Err(GatewayError::internal("Failed to serialize XML response"));
    }

    let mut body = String::with_capacity(XML_DECLARATION.len() + xml.len());
    body.push_str(XML_DECLARATION);
    body.push_str(&xml);
    Ok(body.into_bytes())
}

fn to_json(response: &RoutingResponse) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(response)?)
}
