//! Run-time context of the network function.
//!
//! Built once from the validated configuration before any request is
//! served, then shared read-only (`Arc<QofContext>`) with the registrar and
//! handlers.

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::config::schema::{QofConfig, Scheme, Snssai};

/// Slice served when the configuration lists none.
pub fn default_snssai() -> Snssai {
    Snssai {
        sst: 1,
        sd: Some("010203".to_string()),
    }
}

/// Identity, binding, and default resources of this NF instance.
#[derive(Debug, Clone)]
pub struct QofContext {
    pub nf_instance_id: Uuid,
    pub name: String,
    pub uri_scheme: Scheme,
    pub register_ipv4: IpAddr,
    pub binding_ipv4: IpAddr,
    pub sbi_port: u16,
    configured_snssais: Vec<Snssai>,
    snssais: Vec<Snssai>,
    ready_at: Option<Instant>,
}

impl QofContext {
    /// Take identity and binding from the configuration.
    pub fn init(config: &QofConfig) -> Self {
        let configuration = &config.configuration;
        let sbi = &configuration.sbi;

        let context = Self {
            nf_instance_id: Uuid::new_v4(),
            name: configuration.qof_name.clone(),
            uri_scheme: sbi.scheme,
            register_ipv4: sbi.register_ipv4,
            binding_ipv4: sbi.binding_ipv4,
            sbi_port: sbi.port,
            configured_snssais: configuration.snssai_list.clone(),
            snssais: Vec::new(),
            ready_at: None,
        };

        tracing::info!(
            nf_instance_id = %context.nf_instance_id,
            sbi_uri = %context.sbi_uri(),
            "QOF context initialized"
        );
        context
    }

    /// Install the default slice table. Marks the context ready.
    pub fn init_default_slices(&mut self) {
        self.snssais = if self.configured_snssais.is_empty() {
            vec![default_snssai()]
        } else {
            self.configured_snssais.clone()
        };
        self.ready_at = Some(Instant::now());

        tracing::debug!(slices = self.snssais.len(), "Default slices installed");
    }

    /// Address the SBI listener binds to.
    pub fn sbi_addr(&self) -> SocketAddr {
        SocketAddr::new(self.binding_ipv4, self.sbi_port)
    }

    /// URI other NFs use to reach this instance.
    pub fn sbi_uri(&self) -> String {
        format!(
            "{}://{}",
            self.uri_scheme,
            SocketAddr::new(self.register_ipv4, self.sbi_port)
        )
    }

    pub fn snssais(&self) -> &[Snssai] {
        &self.snssais
    }

    /// When default resources were installed, if they have been.
    pub fn ready_at(&self) -> Option<Instant> {
        self.ready_at
    }

    pub fn is_ready(&self) -> bool {
        self.ready_at.is_some()
    }

    /// Profile published by the status endpoint.
    pub fn profile(&self) -> NfProfile {
        NfProfile {
            nf_instance_id: self.nf_instance_id,
            nf_name: self.name.clone(),
            uri: self.sbi_uri(),
            snssais: self.snssais.clone(),
        }
    }
}

/// Public view of the instance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NfProfile {
    pub nf_instance_id: Uuid,
    pub nf_name: String,
    pub uri: String,
    pub snssais: Vec<Snssai>,
}
