/// Laptop image accepted by UploadImage
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    pub laptop_id: String,
    /// File extension as sent by the client, e.g. ".jpg"
    pub image_type: String,
    pub data: Vec<u8>,
}

impl Image {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("laptop_id", &self.laptop_id)
            .field("image_type", &self.image_type)
            .field("size", &self.size())
            .finish()
    }
}
