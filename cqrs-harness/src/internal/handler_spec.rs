use crate::{Error, HandlerName, MessageType, Result};

/// Raw declarations collected by a configurer, validated in [`finish`](Self::finish).
#[derive(Debug, Default)]
pub(crate) struct HandlerSpec {
    names: Vec<String>,
    routes: Vec<MessageType>,
}

impl HandlerSpec {
    pub fn name(&mut self, name: &str) {
        self.names.push(name.to_owned());
    }

    pub fn route(&mut self, message_type: MessageType) {
        self.routes.push(message_type);
    }

    pub fn finish(self) -> Result<(HandlerName, Vec<MessageType>)> {
        let mut names = self.names.into_iter();
        let name = names.next().ok_or(Error::MissingHandlerName)?;
        if name.trim().is_empty() {
            return Err(Error::EmptyHandlerName);
        }
        let name = HandlerName::from(name);
        if names.next().is_some() {
            return Err(Error::HandlerAlreadyNamed(name));
        }
        if self.routes.is_empty() {
            return Err(Error::NoRoutes(name));
        }
        for (i, route) in self.routes.iter().enumerate() {
            if self.routes[..i].contains(route) {
                return Err(Error::DuplicateRoute {
                    handler: name,
                    message_type: route.clone(),
                });
            }
        }
        Ok((name, self.routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_spec() {
        let mut spec = HandlerSpec::default();
        spec.name("account");
        spec.route(MessageType::new("OpenAccount"));
        spec.route(MessageType::new("Deposit"));

        let (name, routes) = spec.finish().unwrap();
        assert_eq!(name, "account");
        assert_eq!(routes, vec![MessageType::new("OpenAccount"), MessageType::new("Deposit")]);
    }

    #[test]
    fn missing_name() {
        let mut spec = HandlerSpec::default();
        spec.route(MessageType::new("OpenAccount"));
        assert_eq!(spec.finish().unwrap_err(), Error::MissingHandlerName);
    }

    #[test]
    fn blank_name() {
        let mut spec = HandlerSpec::default();
        spec.name("  ");
        spec.route(MessageType::new("OpenAccount"));
        assert_eq!(spec.finish().unwrap_err(), Error::EmptyHandlerName);
    }

    #[test]
    fn named_twice() {
        let mut spec = HandlerSpec::default();
        spec.name("account");
        spec.name("ledger");
        spec.route(MessageType::new("OpenAccount"));
        assert_eq!(
            spec.finish().unwrap_err(),
            Error::HandlerAlreadyNamed("account".into())
        );
    }

    #[test]
    fn no_routes() {
        let mut spec = HandlerSpec::default();
        spec.name("account");
        assert_eq!(spec.finish().unwrap_err(), Error::NoRoutes("account".into()));
    }

    #[test]
    fn duplicate_route() {
        let mut spec = HandlerSpec::default();
        spec.name("account");
        spec.route(MessageType::new("OpenAccount"));
        spec.route(MessageType::new("OpenAccount"));
        assert_eq!(
            spec.finish().unwrap_err(),
            Error::DuplicateRoute {
                handler: "account".into(),
                message_type: MessageType::new("OpenAccount"),
            }
        );
    }
}
