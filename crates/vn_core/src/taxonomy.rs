//! The category tree used for site navigation and categorized listing.
//!
//! Membership is computed by slug equality against these values, so the
//! `slug` entries must stay byte-identical to what [`crate::slug::slugify`]
//! produces for the names (a handful are deliberate editorial exceptions,
//! e.g. the Video "Xe" section).

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SubCategory {
    pub name: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub slug: &'static str,
    pub sub_categories: &'static [SubCategory],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Thời sự",
        slug: "thoi-su",
        sub_categories: &[
            SubCategory { name: "Chính trị", slug: "chinh-tri" },
            SubCategory { name: "Nhân sự", slug: "nhan-su" },
            SubCategory { name: "Kỷ nguyên mới", slug: "ky-nguyen-moi" },
            SubCategory { name: "Dân sinh", slug: "dan-sinh" },
            SubCategory { name: "Việc làm", slug: "viec-lam" },
            SubCategory { name: "Giao thông", slug: "giao-thong" },
            SubCategory { name: "Mekong", slug: "mekong" },
            SubCategory { name: "Quỹ Hy vọng", slug: "quy-hy-vong" },
        ],
    },
    Category {
        name: "Thế giới",
        slug: "the-gioi",
        sub_categories: &[
            SubCategory { name: "Tư liệu", slug: "tu-lieu" },
            SubCategory { name: "Phân tích", slug: "phan-tich" },
            SubCategory { name: "Người Việt 5 châu", slug: "nguoi-viet-5-chau" },
            SubCategory { name: "Cuộc sống đó đây", slug: "cuoc-song-do-day" },
            SubCategory { name: "Quân sự", slug: "quan-su" },
        ],
    },
    Category {
        name: "Kinh doanh",
        slug: "kinh-doanh",
        sub_categories: &[
            SubCategory { name: "NetZero", slug: "net-zero" },
            SubCategory { name: "Quốc tế", slug: "quoc-te" },
            SubCategory { name: "Doanh nghiệp", slug: "doanh-nghiep" },
            SubCategory { name: "Chứng khoán", slug: "chung-khoan" },
            SubCategory { name: "Ebank", slug: "ebank" },
            SubCategory { name: "Vĩ mô", slug: "vi-mo" },
            SubCategory { name: "Tiền của tôi", slug: "tien-cua-toi" },
            SubCategory { name: "Hàng hóa", slug: "hang-hoa" },
        ],
    },
    Category {
        name: "Công nghệ",
        slug: "cong-nghe",
        sub_categories: &[
            SubCategory { name: "AI", slug: "ai" },
            SubCategory { name: "Chuyển đổi số", slug: "chuyen-doi-so" },
            SubCategory { name: "Nhịp sống số", slug: "nhip-song-so" },
            SubCategory { name: "Thiết bị", slug: "thiet-bi" },
            SubCategory { name: "Trải nghiệm", slug: "trai-nghiem" },
            SubCategory { name: "GameVerse 2025", slug: "vgv-2025" },
        ],
    },
    Category {
        name: "Khoa học",
        slug: "khoa-hoc",
        sub_categories: &[
            SubCategory { name: "Tin tức", slug: "tin-tuc" },
            SubCategory { name: "Đổi mới sáng tạo", slug: "doi-moi-sang-tao" },
            SubCategory { name: "Bàn tròn", slug: "ban-tron" },
            SubCategory { name: "Nhân vật", slug: "nhan-vat" },
            SubCategory { name: "Cửa sổ tri thức", slug: "cua-so-tri-thuc" },
            SubCategory { name: "Thế giới tự nhiên", slug: "the-gioi-tu-nhien" },
            SubCategory { name: "Vũ trụ", slug: "vu-tru" },
            SubCategory { name: "Sáng kiến khoa học 2025", slug: "cuoc-thi-sang-kien-khoa-hoc" },
        ],
    },
    Category {
        name: "Video",
        slug: "video",
        sub_categories: &[
            SubCategory { name: "Thời sự", slug: "thoi-su" },
            SubCategory { name: "Nhịp sống", slug: "nhip-song" },
            SubCategory { name: "Food", slug: "food" },
            SubCategory { name: "Pháp luật", slug: "phap-luat" },
            SubCategory { name: "Giải trí", slug: "giai-tri" },
            SubCategory { name: "Thế giới", slug: "the-gioi" },
            SubCategory { name: "Khoa học", slug: "khoa-hoc" },
            SubCategory { name: "Thể thao", slug: "the-thao" },
            SubCategory { name: "Giáo dục", slug: "giao-duc" },
            SubCategory { name: "Xe", slug: "oto-xemay" },
            SubCategory { name: "Công nghệ", slug: "cong-nghe" },
            SubCategory { name: "Du lịch", slug: "du-lich" },
            SubCategory { name: "Sức khỏe", slug: "suc-khoe" },
            SubCategory { name: "Chủ đề", slug: "chu-de" },
        ],
    },
    Category {
        name: "Podcasts",
        slug: "podcast",
        sub_categories: &[
            SubCategory { name: "VnExpress hôm nay", slug: "vnexpress-hom-nay" },
            SubCategory { name: "Tâm điểm kinh tế", slug: "tam-diem-kinh-te" },
            SubCategory { name: "Tài chính cá nhân", slug: "tai-chinh-ca-nhan" },
            SubCategory { name: "Giải mã", slug: "giai-ma" },
            SubCategory { name: "Hộp đen", slug: "hop-den" },
            SubCategory { name: "Thầm thì", slug: "tham-thi" },
            SubCategory { name: "Tôi kể", slug: "toi-ke" },
            SubCategory { name: "Bạn ổn không?", slug: "ban-on-khong" },
            SubCategory { name: "Điểm tin", slug: "diem-tin" },
            SubCategory { name: "Tiền làm gì?", slug: "tien-lam-gi" },
            SubCategory { name: "Họ nói gì?", slug: "ho-noi-gi" },
            SubCategory { name: "Ly hôn", slug: "ly-hon" },
            SubCategory { name: "Người tiên phong", slug: "nguoi-tien-phong" },
            SubCategory { name: "Kế hoạch lạc quan", slug: "ke-hoach-lac-quan" },
            SubCategory { name: "360° World Cup", slug: "360-world-cup" },
            SubCategory { name: "Tôi trong gương", slug: "toi-trong-guong" },
            SubCategory { name: "Chuyện đi làm", slug: "chuyen-di-lam" },
            SubCategory { name: "Úp mở 18+", slug: "up-mo-18" },
            SubCategory { name: "Nguy - Cơ", slug: "nguy-co" },
        ],
    },
    Category {
        name: "Góc nhìn",
        slug: "goc-nhin",
        sub_categories: &[
            SubCategory { name: "Bình luận nhiều", slug: "binh-luan-nhieu" },
            SubCategory { name: "Chính trị & chính sách", slug: "chinh-tri-chinh-sach" },
            SubCategory { name: "Y tế & sức khỏe", slug: "y-te-suc-khoe" },
            SubCategory { name: "Kinh doanh & quản trị", slug: "kinh-doanh-quan-tri" },
            SubCategory { name: "Giáo dục & tri thức", slug: "giao-duc-tri-thuc" },
            SubCategory { name: "Môi trường", slug: "moi-truong" },
            SubCategory { name: "Văn hóa & lối sống", slug: "van-hoa-loi-song" },
            SubCategory { name: "Covid 19", slug: "covid-19" },
            SubCategory { name: "Tác giả", slug: "tac-gia" },
        ],
    },
];

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn find_main(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug == slug)
}

pub fn find_sub(main_slug: &str, sub_slug: &str) -> Option<&'static SubCategory> {
    find_main(main_slug)?
        .sub_categories
        .iter()
        .find(|s| s.slug == sub_slug)
}
