use crate::common::virtual_network::VirtualNetwork;

pub fn vnet_triangle() -> VirtualNetwork {
    VirtualNetwork::create(
        &[1, 2, 3],
        &[
            (1, 2, 2.0),
            (1, 3, 5.0),
            (2, 3, 1.0),
        ]
    )
}

pub fn vnet_simple_weighted() -> VirtualNetwork {
    VirtualNetwork::create(
        &[1, 2, 3, 4, 5],
        &[
            (1, 2, 2.0),
            (1, 3, 1.0),
            (2, 3, 4.0),
            (2, 4, 5.0),
            (3, 4, 100.0),
            (3, 5, 8.0),
            (4, 5, 1.0),
        ]
    )
}

/// 1 - 2 - ... - n, every link costs 1
pub fn vnet_chain(n: i64) -> VirtualNetwork {
    let nodes: Vec<i64> = (1..=n).collect();
    let links: Vec<(i64, i64, f64)> = (1..n).map(|i| (i, i + 1, 1.0)).collect();
    VirtualNetwork::create(&nodes, &links)
}
