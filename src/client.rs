use std::{path::Path, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use url::Url;

use crate::{
    DEFAULT_HOST, DEFAULT_SCHEME, DEFAULT_VERSION, Error, Result,
    config::{ChartSpec, format_number},
    models::{PostData, ShortUrlResponse, mime_type},
    sign,
    transport::{HttpTransport, Transport},
};

// Chained setter for a single field.
macro_rules! param_setter {
    ($(#[$meta:meta])* $name:ident, $field:ident, into $ty:ty) => {
        $(#[$meta])*
        pub fn $name(mut self, $field: impl Into<$ty>) -> Self {
            self.$field = $field.into();
            self
        }
    };
    ($(#[$meta:meta])* $name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(mut self, $field: $ty) -> Self {
            self.$field = $field;
            self
        }
    };
}

/// Builds chart urls and talks to the QuickChart service.
///
/// ```rust
/// use quickchart::QuickChart;
/// use serde_json::json;
///
/// let url = QuickChart::default()
///     .set_config(json!({
///         "type": "bar",
///         "data": { "labels": ["Q1", "Q2"], "datasets": [{ "label": "Sales", "data": [5, 8] }] }
///     }))
///     .set_width(800)
///     .set_height(400)
///     .get_url()
///     .unwrap();
/// assert!(url.contains("w=800&h=400"));
/// ```
#[derive(Debug, Clone)]
pub struct QuickChart {
    host: String,
    scheme: String,
    api_key: Option<String>,
    account_id: Option<String>,
    transport: Option<Arc<dyn Transport>>,

    chart: Option<String>,
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
    background_color: String,
    format: String,
    version: String,
}

impl Default for QuickChart {
    fn default() -> Self {
        QuickChart::builder().build()
    }
}

#[bon::bon]
impl QuickChart {
    #[builder]
    pub fn new(
        #[builder(into)] api_key: Option<String>,
        #[builder(into)] account_id: Option<String>,
        #[builder(into, default = DEFAULT_HOST.to_string())] host: String,
        #[builder(into, default = DEFAULT_SCHEME.to_string())] scheme: String,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self {
            host,
            scheme,
            api_key,
            account_id,
            transport,
            chart: None,
            width: 500,
            height: 300,
            device_pixel_ratio: 1.0,
            background_color: "#ffffff".to_string(),
            format: "png".to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl QuickChart {
    pub fn with_credentials(api_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        QuickChart::builder()
            .api_key(api_key)
            .account_id(account_id)
            .build()
    }

    /// Replaces the active chart. Text is used verbatim, values are
    /// serialized immediately.
    pub fn set_config(mut self, chart: impl Into<ChartSpec>) -> Self {
        self.chart = chart.into().serialize();
        self
    }

    /// Like [`set_config`](Self::set_config) for any serializable config.
    pub fn try_set_config<T: Serialize + ?Sized>(self, chart: &T) -> Result<Self> {
        Ok(self.set_config(ChartSpec::from_serialize(chart)?))
    }

    param_setter!(set_width, width, u32);
    param_setter!(set_height, height, u32);
    param_setter!(
        /// `1.0` is the service default and is left out of urls.
        set_device_pixel_ratio,
        device_pixel_ratio,
        f64
    );
    param_setter!(
        /// Any css color, or `"transparent"`. Empty leaves it to the service.
        set_background_color,
        background_color,
        into String
    );
    param_setter!(
        /// `png`, `webp`, `jpg`, `svg`, `pdf` or `base64`.
        set_format,
        format,
        into String
    );
    param_setter!(
        /// Chart.js version the service should render with.
        set_version,
        version,
        into String
    );

    pub fn is_valid(&self) -> bool {
        self.chart.as_deref().is_some_and(|chart| !chart.is_empty())
    }

    pub fn chart(&self) -> Option<&str> {
        self.chart.as_deref()
    }

    fn require_chart(&self) -> Result<&str> {
        self.chart
            .as_deref()
            .filter(|chart| !chart.is_empty())
            .ok_or(Error::MissingChart)
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}://{}{}", self.scheme, self.host, path))?)
    }

    fn url(&self) -> Result<Url> {
        let chart = self.require_chart()?;
        let mut url = self.endpoint("/chart")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("c", chart)
                .append_pair("w", &self.width.to_string())
                .append_pair("h", &self.height.to_string());
            if self.device_pixel_ratio != 1.0 {
                query.append_pair(
                    "devicePixelRatio",
                    &format_number(self.device_pixel_ratio),
                );
            }
            if !self.background_color.is_empty() {
                query.append_pair("bkg", &self.background_color);
            }
            if !self.format.is_empty() {
                query.append_pair("f", &self.format);
            }
            if !self.version.is_empty() {
                query.append_pair("v", &self.version);
            }
            if let Some(key) = self.api_key() {
                query.append_pair("key", key);
            }
        }
        Ok(url)
    }

    /// Url that renders the chart when fetched, e.g. from an `<img>` tag.
    pub fn get_url(&self) -> Result<String> {
        Ok(self.url()?.into())
    }

    /// Url authenticated with an HMAC of the chart instead of the api key.
    pub fn get_signed_url(&self) -> Result<String> {
        let (Some(account_id), Some(api_key)) = (
            self.account_id.as_deref().filter(|id| !id.is_empty()),
            self.api_key(),
        ) else {
            return Err(Error::MissingCredentials);
        };
        Ok(sign::sign_url(self.url()?, api_key, account_id)?.into())
    }

    pub fn get_post_data(&self) -> Result<PostData> {
        let chart = self.require_chart()?.to_string();
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Ok(PostData {
            chart,
            width: self.width,
            height: self.height,
            format: non_empty(&self.format),
            version: non_empty(&self.version),
            background_color: non_empty(&self.background_color),
            device_pixel_ratio: (self.device_pixel_ratio != 0.0).then_some(self.device_pixel_ratio),
            key: self.api_key().map(str::to_string),
        })
    }

    fn transport(&self) -> Result<Arc<dyn Transport>> {
        match &self.transport {
            Some(transport) => Ok(Arc::clone(transport)),
            None => Ok(Arc::new(HttpTransport::new()?)),
        }
    }

    /// Creates a short url through the service. Only available on
    /// quickchart.io.
    #[tracing::instrument(skip(self))]
    pub async fn get_short_url(&self) -> Result<String> {
        let post_data = self.get_post_data()?;
        if self.host != DEFAULT_HOST {
            return Err(Error::HostPolicy {
                host: self.host.clone(),
            });
        }
        let url = self.endpoint("/chart/create")?;
        debug!("Creating short url via {}", url);

        let resp = self.transport()?.post_json(&url, &post_data).await?;
        if resp.status != StatusCode::OK {
            warn!("Short url request failed with {}", resp.status);
            return Err(Error::BadStatus {
                endpoint: "shorturl",
                status: resp.status,
                detail: resp.error_detail(),
            });
        }

        let data: ShortUrlResponse = resp.json()?;
        if !data.success {
            return Err(Error::ShortUrlRejected);
        }
        data.url.ok_or(Error::MissingShortUrl)
    }

    /// Renders the chart and returns the image bytes.
    #[tracing::instrument(skip(self))]
    pub async fn to_binary(&self) -> Result<Vec<u8>> {
        let post_data = self.get_post_data()?;
        let url = self.endpoint("/chart")?;
        debug!("Rendering {} chart via {}", self.format, url);

        let resp = self.transport()?.post_json(&url, &post_data).await?;
        if !resp.status.is_success() {
            warn!("Render request failed with {}", resp.status);
            return Err(Error::BadStatus {
                endpoint: "render",
                status: resp.status,
                detail: resp.error_detail(),
            });
        }
        Ok(resp.body)
    }

    /// Renders the chart as a `data:` uri.
    pub async fn to_data_url(&self) -> Result<String> {
        let mime = mime_type(&self.format);
        let buf = self.to_binary().await?;
        Ok(format!("data:{mime};base64,{}", STANDARD.encode(buf)))
    }

    /// Renders the chart and writes it to `path`, replacing any existing file.
    #[tracing::instrument(skip_all)]
    pub async fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let buf = self.to_binary().await?;
        tokio::fs::write(path.as_ref(), &buf).await?;
        debug!("Wrote {} bytes to {}", buf.len(), path.as_ref().display());
        Ok(())
    }

    pub async fn to_writer<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let buf = self.to_binary().await?;
        writer.write_all(&buf).await?;
        writer.flush().await?;
        Ok(())
    }
}
