//! # Nextcloud HTTP Client
//!
//! [`NextcloudClient`] implements [`Storage`] with three request shapes:
//!
//! | Family  | Endpoint                                           | Success            |
//! |---------|----------------------------------------------------|--------------------|
//! | WebDAV  | `<base>/remote.php/webdav/<path>`                  | no Sabre exception |
//! | Apps    | `<base>/apps/<path>` (POST, form body)             | `statuscode` 100   |
//! | OCS     | `<base>/ocs/v2.php/apps/files_sharing/api/v1/...`  | `statuscode` 200   |
//!
//! Every request carries HTTP Basic credentials. Apps and OCS requests also
//! send `OCS-APIRequest: true` and a form-encoded body.
//!
//! ## Detecting WebDAV errors
//!
//! Nextcloud reports WebDAV failures as a Sabre `<d:error>` document. How a
//! response is classified depends on [`ErrorDetection`]:
//!
//! - `StatusFirst`: non-2xx is an error (`Remote` when the body names an
//!   exception, `Status` otherwise). A 2xx body starting with `<` is only an
//!   error when it decodes to a Sabre error with an exception; anything else
//!   is payload, so downloading an XML or HTML file just works.
//! - `BodySniff`: the status is ignored. A body starting with `<` must decode
//!   as an error document; if it doesn't, the decode failure is returned.

use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, Verb};
use super::{path_segments, Storage};
use crate::config::{ClientConfig, ErrorDetection};
use crate::error::{CloudError, Result};
use crate::model::{ShareResult, APPS_SUCCESS, SHARE_SUCCESS};
use crate::xml::{decode_request_error, decode_share_result};
use log::debug;
use url::form_urlencoded;
use url::Url;

const WEBDAV_PREFIX: &[&str] = &["remote.php", "webdav"];
const APPS_PREFIX: &[&str] = &["apps"];
const SHARES_PREFIX: &[&str] = &[
    "ocs",
    "v2.php",
    "apps",
    "files_sharing",
    "api",
    "v1",
    "shares",
];

/// Client bound to one Nextcloud instance and one set of credentials.
pub struct NextcloudClient<T: Transport = ReqwestTransport> {
    transport: T,
    base: Url,
    username: String,
    password: String,
    detection: ErrorDetection,
}

impl NextcloudClient<ReqwestTransport> {
    /// Validate the settings and build a client. No request is sent.
    pub fn new(url: &str, username: &str, password: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(url, username, password))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        // Validate before building the HTTP client so bad settings are
        // always reported as configuration errors.
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> NextcloudClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        let base = config.validate()?;
        Ok(Self {
            transport,
            base,
            username: config.username.clone(),
            password: config.password.clone(),
            detection: config.error_detection,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn error_detection(&self) -> ErrorDetection {
        self.detection
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- URL builders ---

    fn endpoint(&self, prefix: &[&str], tail: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                CloudError::InvalidRequest(format!("{} cannot be a base URL", self.base))
            })?;
            segments.pop_if_empty();
            segments.extend(prefix);
            segments.extend(tail);
        }
        Ok(url)
    }

    fn webdav_url(&self, path: &str) -> Result<Url> {
        self.endpoint(WEBDAV_PREFIX, &path_segments(path))
    }

    fn shares_url(&self, id: Option<u64>) -> Result<Url> {
        match id {
            Some(id) => {
                let id = id.to_string();
                self.endpoint(SHARES_PREFIX, &[id.as_str()])
            }
            None => self.endpoint(SHARES_PREFIX, &[]),
        }
    }

    // --- Request plumbing ---

    fn request(&self, verb: Verb, url: Url, body: Vec<u8>) -> HttpRequest {
        HttpRequest {
            verb,
            url,
            username: self.username.clone(),
            password: self.password.clone(),
            headers: Vec::new(),
            body,
        }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let label = format!("{} {}", request.verb, request.url);
        let response = self.transport.send(request)?;
        debug!("{} -> {}", label, response.status);
        Ok(response)
    }

    fn send_webdav(&self, verb: Verb, path: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.send_webdav_with(verb, path, body, Vec::new())
    }

    fn send_webdav_with(
        &self,
        verb: Verb,
        path: &str,
        body: Vec<u8>,
        headers: Vec<(&'static str, String)>,
    ) -> Result<Vec<u8>> {
        let url = self.webdav_url(path)?;
        let mut request = self.request(verb, url.clone(), body);
        request.headers = headers;
        let response = self.send(request)?;
        check_webdav_response(self.detection, verb, &url, response)
    }

    fn send_ocs(
        &self,
        verb: Verb,
        url: Url,
        form: &[(&str, String)],
        expected: u64,
        operation: &str,
    ) -> Result<ShareResult> {
        let mut request = self.request(verb, url, encode_form(form));
        request.headers.push(("OCS-APIRequest", "true".to_string()));
        request.headers.push((
            "Content-Type",
            "application/x-www-form-urlencoded".to_string(),
        ));

        let response = self.send(request)?;
        let result = decode_share_result(&response.body)?;
        if !result.is_success(expected) {
            debug!(
                "{} failed with status code {}: {}",
                operation, result.status_code, result.message
            );
            return Err(CloudError::Api {
                operation: operation.to_string(),
                code: result.status_code,
                message: result.message,
            });
        }
        Ok(result)
    }

    fn send_apps(
        &self,
        path: &[&str],
        form: &[(&str, String)],
        operation: &str,
    ) -> Result<ShareResult> {
        let url = self.endpoint(APPS_PREFIX, path)?;
        self.send_ocs(Verb::Post, url, form, APPS_SUCCESS, operation)
    }
}

fn encode_form(form: &[(&str, String)]) -> Vec<u8> {
    if form.is_empty() {
        return Vec::new();
    }
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
        .into_bytes()
}

/// Classify a WebDAV response as payload or error.
fn check_webdav_response(
    detection: ErrorDetection,
    verb: Verb,
    url: &Url,
    response: HttpResponse,
) -> Result<Vec<u8>> {
    let looks_like_xml = response.body.first() == Some(&b'<');

    match detection {
        ErrorDetection::BodySniff => {
            if looks_like_xml {
                let error = decode_request_error(&response.body)?;
                if error.is_error() {
                    return Err(remote_error(error.exception, error.message));
                }
            }
            Ok(response.body)
        }
        ErrorDetection::StatusFirst => {
            let reported = if looks_like_xml {
                decode_request_error(&response.body)
                    .ok()
                    .filter(|e| e.is_error())
            } else {
                None
            };

            if let Some(error) = reported {
                return Err(remote_error(error.exception, error.message));
            }
            if !response.is_success() {
                return Err(CloudError::Status {
                    verb: verb.to_string(),
                    url: url.to_string(),
                    status: response.status,
                });
            }
            Ok(response.body)
        }
    }
}

fn remote_error(exception: String, message: String) -> CloudError {
    debug!("server reported {}: {}", exception, message);
    CloudError::Remote { exception, message }
}

impl<T: Transport> Storage for NextcloudClient<T> {
    fn mkdir(&self, path: &str) -> Result<()> {
        self.send_webdav(Verb::Mkcol, path, Vec::new()).map(|_| ())
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.send_webdav(Verb::Delete, path, Vec::new()).map(|_| ())
    }

    fn upload(&self, src: &[u8], dest: &str) -> Result<()> {
        self.send_webdav(Verb::Put, dest, src.to_vec()).map(|_| ())
    }

    fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.send_webdav(Verb::Get, path, Vec::new())
    }

    fn exists(&self, path: &str) -> bool {
        self.send_webdav_with(Verb::Propfind, path, Vec::new(), vec![("Depth", "0".to_string())])
            .is_ok()
    }

    fn create_group_folder(&self, mount_point: &str) -> Result<ShareResult> {
        self.send_apps(
            &["groupfolders", "folders"],
            &[("mountpoint", mount_point.to_string())],
            "create group folder",
        )
    }

    fn add_group_to_group_folder(&self, group: &str, folder_id: u64) -> Result<ShareResult> {
        let folder = folder_id.to_string();
        self.send_apps(
            &["groupfolders", "folders", folder.as_str(), "groups"],
            &[("group", group.to_string())],
            "add group to group folder",
        )
    }

    fn set_group_permissions_for_group_folder(
        &self,
        permissions: u32,
        group: &str,
        folder_id: u64,
    ) -> Result<ShareResult> {
        let folder = folder_id.to_string();
        self.send_apps(
            &["groupfolders", "folders", folder.as_str(), "groups", group],
            &[("permissions", permissions.to_string())],
            "set group folder permissions",
        )
    }

    fn create_share(
        &self,
        path: &str,
        share_type: u32,
        public_upload: bool,
        permissions: u32,
    ) -> Result<ShareResult> {
        self.send_ocs(
            Verb::Post,
            self.shares_url(None)?,
            &[
                ("path", path.to_string()),
                ("shareType", share_type.to_string()),
                ("publicUpload", public_upload.to_string()),
                ("permissions", permissions.to_string()),
            ],
            SHARE_SUCCESS,
            "create share",
        )
    }

    fn get_share(&self, path: &str) -> Result<ShareResult> {
        let mut url = self.shares_url(None)?;
        url.query_pairs_mut().append_pair("path", path);
        self.send_ocs(Verb::Get, url, &[], SHARE_SUCCESS, "get share")
    }

    fn delete_share(&self, id: u64) -> Result<ShareResult> {
        self.send_ocs(
            Verb::Delete,
            self.shares_url(Some(id))?,
            &[],
            SHARE_SUCCESS,
            "delete share",
        )
    }

    fn update_share_permissions(&self, id: u64, permissions: u32) -> Result<ShareResult> {
        self.send_ocs(
            Verb::Put,
            self.shares_url(Some(id))?,
            &[("permissions", permissions.to_string())],
            SHARE_SUCCESS,
            "update share",
        )
    }
}
