//! The reference text shown above each protocol's playground.

use crate::types::Protocol;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub use_cases: &'static [&'static str],
}

const REST: ProtocolInfo = ProtocolInfo {
    title: "REST (Representational State Transfer)",
    description: "REST is an architectural style that defines a set of constraints for creating \
                  web services. It is the most popular and widely adopted approach for designing \
                  networked applications, especially for public APIs. RESTful services use \
                  standard HTTP methods (GET, POST, PUT, DELETE) and are stateless, meaning each \
                  request from a client to a server must contain all the information needed to \
                  understand and complete the request.",
    pros: &[
        "Simplicity & Familiarity: Uses standard HTTP methods, making it easy to understand and implement.",
        "Scalability: The stateless nature of REST allows it to scale horizontally with ease.",
        "Flexibility: Supports various data formats like JSON, XML, and plain text.",
        "Cacheable: Responses can be cached to improve performance and reduce server load.",
    ],
    cons: &[
        "Over/Under-fetching: Clients often receive more or less data than they need, leading to inefficient data transfer.",
        "Multiple Round Trips: Complex queries may require multiple requests to fetch all the necessary data.",
        "No Strict Contract: Relies on documentation, which can be inconsistent or outdated.",
    ],
    use_cases: &[
        "Public-facing APIs for web and mobile applications.",
        "Simple, resource-oriented web services.",
        "CRUD (Create, Read, Update, Delete) operations.",
        "Content delivery networks (CDNs).",
    ],
};

const GRAPHQL: ProtocolInfo = ProtocolInfo {
    title: "GraphQL",
    description: "GraphQL is a query language for APIs and a server-side runtime for executing \
                  queries by using a type system you define for your data. Unlike REST, GraphQL \
                  allows clients to request exactly the data they need, making it a powerful tool \
                  for building efficient and flexible APIs. It uses a single endpoint for all data \
                  requests, and the schema defines a strong contract between the client and the \
                  server.",
    pros: &[
        "Efficient Data Fetching: Eliminates over-fetching and under-fetching by allowing clients to specify their exact data requirements.",
        "Strongly Typed Schema: The schema serves as a contract, enabling better tooling and fewer integration issues.",
        "Single Endpoint: Simplifies the API by exposing a single endpoint for all queries, mutations, and subscriptions.",
        "Real-time Data: Built-in support for real-time updates through subscriptions.",
    ],
    cons: &[
        "Complexity: Can be more complex to set up and manage compared to REST.",
        "Caching: Caching is more complex due to the single endpoint and varied query structures.",
        "Performance Bottlenecks: Deeply nested or complex queries can lead to performance issues on the server.",
    ],
    use_cases: &[
        "Mobile applications where bandwidth is a concern.",
        "Complex front-end applications that need to fetch data from multiple sources.",
        "Applications with nested or relational data.",
        "Real-time applications like chat or live sports updates.",
    ],
};

const GRPC: ProtocolInfo = ProtocolInfo {
    title: "gRPC (Google Remote Procedure Call)",
    description: "gRPC is a high-performance, open-source RPC (Remote Procedure Call) framework \
                  developed by Google. It uses Protocol Buffers (Protobuf) as its interface \
                  definition language and data serialization format, which is more efficient than \
                  JSON. gRPC is designed for low-latency, high-throughput communication and is \
                  particularly well-suited for microservices architectures.",
    pros: &[
        "High Performance: Uses binary serialization (Protobuf) and HTTP/2, resulting in lower latency and smaller payloads.",
        "Streaming: Native support for bidirectional streaming, allowing for real-time communication.",
        "Strictly Typed Contracts: The .proto file defines a strict contract, reducing integration errors.",
        "Code Generation: Automatic generation of client and server code in multiple languages.",
    ],
    cons: &[
        "Limited Browser Support: Requires a proxy (like gRPC-web) for use in web browsers.",
        "Not Human-Readable: The binary format is not easily debugged without specialized tools.",
        "Steeper Learning Curve: More complex to set up and learn compared to REST.",
    ],
    use_cases: &[
        "Internal communication between microservices.",
        "Real-time applications requiring low latency.",
        "Polyglot environments where services are written in different languages.",
        "Network-constrained environments like mobile applications.",
    ],
};

const WEBSOCKET: ProtocolInfo = ProtocolInfo {
    title: "WebSocket",
    description: "WebSocket is a communication protocol that provides a full-duplex, persistent \
                  connection between a client and a server over a single TCP connection. Unlike \
                  the request-response model of HTTP, WebSockets allow for real-time, \
                  bidirectional communication, making them ideal for applications that require \
                  low-latency updates and interactive features.",
    pros: &[
        "Real-time Communication: Enables instant data exchange between client and server.",
        "Low Latency: Reduces the overhead of establishing new connections for each message.",
        "Bidirectional: Both the client and server can send messages at any time.",
        "Efficient: Less overhead compared to HTTP polling or long-polling.",
    ],
    cons: &[
        "Stateful: Requires both the client and server to maintain the connection state.",
        "Complexity: Can be more complex to implement and manage than traditional HTTP.",
        "Scalability Challenges: Managing a large number of persistent connections can be a challenge.",
    ],
    use_cases: &[
        "Real-time chat applications.",
        "Live sports or financial data feeds.",
        "Multiplayer online games.",
        "Collaborative editing tools.",
    ],
};

const MQTT: ProtocolInfo = ProtocolInfo {
    title: "MQTT (Message Queuing Telemetry Transport)",
    description: "MQTT is a lightweight, publish-subscribe messaging protocol designed for \
                  constrained devices and low-bandwidth, high-latency, or unreliable networks. It \
                  is widely used in the Internet of Things (IoT) and other applications where \
                  efficient and reliable messaging is critical. The protocol's small footprint and \
                  low power consumption make it ideal for embedded systems.",
    pros: &[
        "Lightweight & Efficient: Minimal overhead, making it suitable for constrained devices.",
        "Publish/Subscribe Model: Decouples clients, allowing for scalable and flexible architectures.",
        "Quality of Service (QoS): Provides three levels of message delivery guarantees.",
        "Reliable: Designed to handle unreliable networks and reconnect automatically.",
    ],
    cons: &[
        "Not for Large Payloads: Less suitable for transferring large files or messages.",
        "Broker as Single Point of Failure: The central broker can be a bottleneck if not properly managed.",
        "Security: Security is not part of the core protocol and must be implemented separately (e.g., using TLS).",
    ],
    use_cases: &[
        "Internet of Things (IoT) devices and sensors.",
        "Mobile applications requiring low power consumption.",
        "Industrial automation and monitoring systems.",
        "Home automation and smart devices.",
    ],
};

const SOAP: ProtocolInfo = ProtocolInfo {
    title: "SOAP (Simple Object Access Protocol)",
    description: "SOAP is a protocol for exchanging structured information in the implementation \
                  of web services. It relies on XML for its message format and typically uses \
                  HTTP as a transport protocol. SOAP was once the standard for web services, but \
                  has largely been superseded by REST and other more lightweight protocols. \
                  However, it is still used in some enterprise and legacy systems.",
    pros: &[
        "Standardized & Well-defined: Provides a strict contract through WSDL (Web Services Description Language).",
        "Robust Security: WS-Security offers comprehensive security features for enterprise-level applications.",
        "Built-in Error Handling: The protocol includes standardized error handling.",
        "Transactional: Supports ACID transactions, which are crucial for financial and other sensitive operations.",
    ],
    cons: &[
        "Verbose: The XML format is verbose and leads to larger payloads.",
        "Complex: Difficult to implement and debug compared to modern protocols.",
        "Poor Performance: Slower due to the overhead of XML parsing and processing.",
    ],
    use_cases: &[
        "Enterprise applications requiring high security and reliability.",
        "Financial services and payment gateways.",
        "Legacy systems that have not been updated to more modern protocols.",
        "Telecommunication services.",
    ],
};

impl Protocol {
    pub fn info(self) -> &'static ProtocolInfo {
        match self {
            Protocol::Rest => &REST,
            Protocol::GraphQl => &GRAPHQL,
            Protocol::Grpc => &GRPC,
            Protocol::WebSocket => &WEBSOCKET,
            Protocol::Mqtt => &MQTT,
            Protocol::Soap => &SOAP,
        }
    }
}

fn write_list(out: &mut String, heading: &str, items: &[&str]) {
    let _ = writeln!(out, "\n{}:", heading);

    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

impl ProtocolInfo {
    pub fn render(&self) -> String {
        let mut out = format!("{}\n\n{}\n", self.title, self.description);

        write_list(&mut out, "Pros", self.pros);
        write_list(&mut out, "Cons", self.cons);
        write_list(&mut out, "Common Use Cases", self.use_cases);

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Protocol;

    #[test]
    fn test_every_protocol_has_reference_text() {
        for protocol in Protocol::ALL.iter() {
            let info = protocol.info();

            assert!(info.title.starts_with(protocol.name()), "{}", info.title);
            assert!(!info.description.is_empty());
            assert!(!info.pros.is_empty(), "{} has no pros", protocol);
            assert!(!info.cons.is_empty(), "{} has no cons", protocol);
            assert!(!info.use_cases.is_empty(), "{} has no use cases", protocol);
        }
    }

    #[test]
    fn test_render_lists_sections_in_order() {
        let text = Protocol::Mqtt.info().render();

        assert!(text.starts_with("MQTT (Message Queuing Telemetry Transport)\n\nMQTT is a lightweight"));

        let pros = text.find("\nPros:\n").unwrap();
        let cons = text.find("\nCons:\n").unwrap();
        let use_cases = text.find("\nCommon Use Cases:\n").unwrap();
        assert!(pros < cons && cons < use_cases);
        assert!(text.contains("  - Home automation and smart devices.\n"));
    }
}
