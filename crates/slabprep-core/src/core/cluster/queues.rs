use phf::phf_map;

/// Batch queue serving each compute node.
static NODE_QUEUES: phf::Map<&'static str, &'static str> = phf_map! {
    "node01" => "enp5",
    "node02" => "enp5",
    "node03" => "enp5",
    "node04" => "enp5",
    "node05" => "enp5",
    "node06" => "enp5",
    "node36" => "enp5",
    "node37" => "enp5",
    "node26" => "enp3",
    "node27" => "enp3",
    "node28" => "enp3",
    "node29" => "enp3",
    "node30" => "enp3",
    "node31" => "enp3",
    "node32" => "enp3",
    "node33" => "enp3",
    "node34" => "enp3",
};

/// Maximum walltime of each queue, in days.
static QUEUE_MAX_WALLTIME_DAYS: phf::Map<&'static str, u32> = phf_map! {
    "enp5" => 20,
    "enp3" => 3,
};

pub fn queue_for_node(node: &str) -> Option<&'static str> {
    NODE_QUEUES.get(node).copied()
}

pub fn max_walltime_days(queue: &str) -> Option<u32> {
    QUEUE_MAX_WALLTIME_DAYS.get(queue).copied()
}
