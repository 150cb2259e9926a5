mod cluster_flows;
mod tcp_network;
