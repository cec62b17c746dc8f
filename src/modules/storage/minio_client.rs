//! MinIO/S3-compatible storage client.
//!
//! Photos are written under the public prefix, which gets an anonymous
//! read policy at startup so stored URLs can be shown on the map directly.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use tracing::{debug, info, warn};

use super::sigv4;
use super::{ObjectStorage, StoredObject};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    http_client: Client,
}

impl MinIOClient {
    /// Connect to the configured bucket, creating it and its public read
    /// policy when missing.
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        };

        client.ensure_bucket_exists().await;
        client.set_public_read_policy().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    /// Create the bucket; an existing bucket is fine
    async fn ensure_bucket_exists(&self) {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => info!("Bucket '{}' created", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Allow anonymous reads under the public prefix; failures are logged only
    async fn set_public_read_policy(&self) {
        let bucket_name = self.bucket.name();
        let policy = public_read_policy(&bucket_name, &self.public_prefix);

        match self.put_bucket_policy(&bucket_name, &policy).await {
            Ok(()) => info!(
                "Set public read policy for {}/{}/*",
                bucket_name, self.public_prefix
            ),
            Err(e) => warn!(
                "Failed to set bucket policy for '{}': {}. \
                Set it manually with: mc anonymous set download minio/{}/{}",
                bucket_name, e, bucket_name, self.public_prefix
            ),
        }
    }

    /// PUT ?policy signed with AWS Signature v4
    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<(), AppError> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let payload_hash = sigv4::sha256_hex(policy.as_bytes());
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        let canonical_request = format!(
            "PUT\n/{}\npolicy=\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            bucket_name, host_header, payload_hash, amz_date, signed_headers, payload_hash
        );

        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            sigv4::ALGORITHM,
            amz_date,
            credential_scope,
            sigv4::sha256_hex(canonical_request.as_bytes())
        );

        let key = sigv4::signing_key(&self.secret_key, &date_stamp, &self.region_name, "s3")?;
        let signature = sigv4::sign(&key, &string_to_sign)?;

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            sigv4::ALGORITHM,
            self.access_key,
            credential_scope,
            signed_headers,
            signature
        );

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Internal(format!(
            "Failed to set bucket policy: {} - {}",
            status, body
        )))
    }

    /// Full object key for a path under the public prefix
    pub fn public_key(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path.trim_start_matches('/'))
    }

    /// Direct URL of an object served through the public endpoint
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }
}

fn public_read_policy(bucket_name: &str, public_prefix: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{bucket_name}/{public_prefix}/*")]
            }
        ]
    })
    .to_string()
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    async fn put_public(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        let key = self.public_key(path);

        self.bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload '{}': {}", key, e))
            })?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());

        let url = self.public_url(&key);
        Ok(StoredObject { key, url })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket.delete_object(key).await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to delete '{}': {}", key, e))
        })?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}
