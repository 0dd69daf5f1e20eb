use rand::Rng;

// 去掉易混淆字符 0/O、1/I/L
const CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// 生成班级加入码
pub fn generate_random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// 生成随机密码（初始管理员使用）
pub fn generate_random_password(len: usize) -> String {
    const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
    const UPPER: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ";
    const DIGITS: &[u8] = b"23456789";

    let mut rng = rand::rng();
    let pools = [LOWER, UPPER, DIGITS];
    let len = len.max(pools.len());

    // 先保证每类字符至少一个，再随机填充
    let mut chars: Vec<char> = pools
        .iter()
        .map(|pool| pool[rng.random_range(0..pool.len())] as char)
        .collect();
    while chars.len() < len {
        let pool = pools[rng.random_range(0..pools.len())];
        chars.push(pool[rng.random_range(0..pool.len())] as char);
    }
    // Fisher-Yates
    for i in (1..chars.len()).rev() {
        let j = rng.random_range(0..=i);
        chars.swap(i, j);
    }
    chars.into_iter().collect()
}
