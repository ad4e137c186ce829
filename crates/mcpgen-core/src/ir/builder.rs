use super::operations::Operation;
use super::schemas::Type;
use super::security::SecurityScheme;
use super::types::{Ir, Meta, Server, Service};

/// Consuming builder that yields one finished [`Ir`].
///
/// Each transformer hands its output over once; `build` fills
/// `service.baseUrls` from the collected servers and returns the document.
#[derive(Debug, Clone)]
pub struct IrBuilder {
    service: Service,
    servers: Vec<Server>,
    types: Vec<Type>,
    operations: Vec<Operation>,
    security_schemes: Vec<SecurityScheme>,
    meta: Option<Meta>,
}

impl IrBuilder {
    pub fn new(service: Service) -> Self {
        Self {
            service,
            servers: Vec::new(),
            types: Vec::new(),
            operations: Vec::new(),
            security_schemes: Vec::new(),
            meta: None,
        }
    }

    pub fn servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    pub fn types(mut self, types: Vec<Type>) -> Self {
        self.types = types;
        self
    }

    pub fn operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations = operations;
        self
    }

    pub fn security_schemes(mut self, schemes: Vec<SecurityScheme>) -> Self {
        self.security_schemes = schemes;
        self
    }

    pub fn meta(mut self, meta: Option<Meta>) -> Self {
        self.meta = meta;
        self
    }

    pub fn build(self) -> Ir {
        let mut service = self.service;
        service.base_urls = self.servers.iter().map(|s| s.url.clone()).collect();

        Ir {
            service,
            types: self.types,
            operations: self.operations,
            servers: self.servers,
            security_schemes: self.security_schemes,
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    #[test]
    fn test_build_fills_base_urls() {
        let service = Service {
            id: "petstore".to_string(),
            title: "Petstore".to_string(),
            version: "1.0".to_string(),
            description: None,
            base_urls: vec![],
        };
        let ir = IrBuilder::new(service)
            .servers(vec![
                Server {
                    url: "https://a.example.com".to_string(),
                    variables: IndexMap::new(),
                },
                Server {
                    url: "https://b.example.com".to_string(),
                    variables: IndexMap::new(),
                },
            ])
            .build();

        assert_eq!(
            ir.service.base_urls,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert!(ir.types.is_empty());
        assert!(ir.meta.is_none());
    }
}
