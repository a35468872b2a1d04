//! Static lookup tables for Đà Nẵng.
//!
//! Keys are written with their proper Vietnamese spelling; the resolver normalizes them on load. Precedence between
//! overlapping street names is decided by match length, not by position in these lists.

use crate::address::District::{self, *};

/// Well-known streets and the district they run through. A street crossing several districts is listed under the one
/// where most of its addresses fall.
pub const DA_NANG_STREETS: &[(&str, District)] = &[
    // Hải Châu
    ("Bạch Đằng", HaiChau),
    ("Trần Phú", HaiChau),
    ("Lê Duẩn", HaiChau),
    ("Hùng Vương", HaiChau),
    ("Phan Châu Trinh", HaiChau),
    ("Nguyễn Văn Linh", HaiChau),
    ("Hoàng Diệu", HaiChau),
    ("Lê Lợi", HaiChau),
    ("Núi Thành", HaiChau),
    ("Trưng Nữ Vương", HaiChau),
    // Thanh Khê
    ("Điện Biên Phủ", ThanhKhe),
    ("Hà Huy Tập", ThanhKhe),
    ("Trần Cao Vân", ThanhKhe),
    ("Nguyễn Tất Thành", ThanhKhe),
    ("Hàm Nghi", ThanhKhe),
    ("Thái Thị Bôi", ThanhKhe),
    // Sơn Trà
    ("Ngô Quyền", SonTra),
    ("Phạm Văn Đồng", SonTra),
    ("Hoàng Sa", SonTra),
    ("Lê Đức Thọ", SonTra),
    ("Trần Hưng Đạo", SonTra),
    // Ngũ Hành Sơn
    ("Võ Nguyên Giáp", NguHanhSon),
    ("Lê Văn Hiến", NguHanhSon),
    ("Trường Sa", NguHanhSon),
    ("Trần Đại Nghĩa", NguHanhSon),
    ("Ngũ Hành Sơn", NguHanhSon),
    // Liên Chiểu
    ("Tôn Đức Thắng", LienChieu),
    ("Nguyễn Lương Bằng", LienChieu),
    ("Âu Cơ", LienChieu),
    ("Nguyễn Tất Thành Nối Dài", LienChieu),
    ("Hoàng Văn Thái", LienChieu),
    // Cẩm Lệ
    ("Cách Mạng Tháng Tám", CamLe),
    ("Ông Ích Đường", CamLe),
    ("Trường Chinh", CamLe),
    ("Nguyễn Hữu Thọ", CamLe),
    ("Lê Đại Hành", CamLe),
    // Hòa Vang
    ("Quốc Lộ 14B", HoaVang),
    ("Tỉnh Lộ 602", HoaVang),
    ("Bà Nà", HoaVang),
];

/// District names, used when no street in the address is known.
pub const DA_NANG_DISTRICT_KEYWORDS: &[(&str, District)] = &[
    ("Hải Châu", HaiChau),
    ("Thanh Khê", ThanhKhe),
    ("Sơn Trà", SonTra),
    ("Ngũ Hành Sơn", NguHanhSon),
    ("Liên Chiểu", LienChieu),
    ("Cẩm Lệ", CamLe),
    ("Hòa Vang", HoaVang),
];
